pub mod media;
pub mod metrics;
pub mod signaling;
pub mod webrtc;

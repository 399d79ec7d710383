pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::{wait_for_ice_gathering_complete, SessionNegotiator, StopOptions};
pub use config::Config;
pub use domain::entities::{MediaSession, StateTransition};
pub use domain::errors::{ErrorKind, Result, SessionError};
pub use domain::ports::{
    MediaElement, MetricsReporter, PeerConnection, PeerConnectionFactory, RemoteTrackHandler,
    SdpAnswer, SignalingClient,
};
pub use domain::value_objects::{
    IceGatheringState, MediaStream, MediaTrack, NegotiatorConfig, SessionRole, SessionState,
    TrackKind,
};
pub use infrastructure::media::TracingElement;
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
pub use infrastructure::signaling::HttpSignalingClient;
pub use infrastructure::webrtc::{WebRtcPeerConnection, WebRtcPeerConnectionFactory};

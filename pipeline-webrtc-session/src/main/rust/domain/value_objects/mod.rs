mod ice_gathering_state;
mod media_stream;
mod negotiator_config;
mod session_role;
mod session_state;

pub use ice_gathering_state::IceGatheringState;
pub use media_stream::{MediaStream, MediaTrack, TrackKind};
pub use negotiator_config::{NegotiatorConfig, DEFAULT_ICE_GATHERING_TIMEOUT};
pub use session_role::SessionRole;
pub use session_state::SessionState;

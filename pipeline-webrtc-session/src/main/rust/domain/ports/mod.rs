mod media_element;
mod metrics_reporter;
mod peer_connection;
mod signaling_client;

pub use media_element::MediaElement;
pub use metrics_reporter::MetricsReporter;
pub use peer_connection::{PeerConnection, PeerConnectionFactory, RemoteTrackHandler};
pub use signaling_client::{SdpAnswer, SignalingClient};

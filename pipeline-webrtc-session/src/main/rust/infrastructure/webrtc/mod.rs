mod peer_connection_adapter;

pub use peer_connection_adapter::{WebRtcPeerConnection, WebRtcPeerConnectionFactory};

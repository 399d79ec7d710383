use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::errors::Result;
use crate::domain::value_objects::{IceGatheringState, MediaTrack, TrackKind};

/// Callback invoked for each remote track the engine reports
pub type RemoteTrackHandler = Box<dyn Fn(MediaTrack) + Send + Sync>;

/// Port for the local media engine's peer connection
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Attach a local track for sending
    async fn add_track(&self, track: &MediaTrack, stream_id: &str) -> Result<()>;

    /// Add a receive-only transceiver of the given kind
    async fn add_recvonly_transceiver(&self, kind: TrackKind) -> Result<()>;

    /// Register the handler for incoming remote tracks
    fn on_remote_track(&self, handler: RemoteTrackHandler);

    /// Create an offer and apply it as the local description
    async fn create_offer(&self) -> Result<String>;

    /// Current local description, including gathered candidates
    async fn local_description(&self) -> Option<String>;

    /// Subscribe to ICE gathering progress. Dropping the receiver detaches.
    fn ice_gathering_state(&self) -> watch::Receiver<IceGatheringState>;

    /// Apply the remote answer
    async fn set_remote_answer(&self, sdp: &str) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Port for constructing peer connections
#[async_trait]
pub trait PeerConnectionFactory: Send + Sync {
    async fn create(&self, ice_servers: &[String]) -> Result<Arc<dyn PeerConnection>>;
}

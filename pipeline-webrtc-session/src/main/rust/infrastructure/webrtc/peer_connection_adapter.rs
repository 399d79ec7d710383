use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MediaEngine, MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::api::APIBuilder;
use webrtc::ice_transport::ice_gatherer_state::RTCIceGathererState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

use crate::domain::errors::{Result, SessionError};
use crate::domain::ports::{PeerConnection, PeerConnectionFactory, RemoteTrackHandler};
use crate::domain::value_objects::{IceGatheringState, MediaTrack, TrackKind};

fn engine_error(context: &str, e: impl std::fmt::Display) -> SessionError {
    SessionError::PeerConnection(format!("{}: {}", context, e))
}

/// Peer connection backed by webrtc-rs
pub struct WebRtcPeerConnection {
    inner: Arc<RTCPeerConnection>,
    ice_state: Arc<watch::Sender<IceGatheringState>>,
}

impl WebRtcPeerConnection {
    fn new(inner: Arc<RTCPeerConnection>) -> Self {
        let (ice_state, _) = watch::channel(IceGatheringState::New);
        let ice_state = Arc::new(ice_state);

        let state_tx = Arc::clone(&ice_state);
        inner.on_ice_gathering_state_change(Box::new(move |state: RTCIceGathererState| {
            let mapped = match state {
                RTCIceGathererState::Gathering => Some(IceGatheringState::Gathering),
                RTCIceGathererState::Complete => Some(IceGatheringState::Complete),
                RTCIceGathererState::New => Some(IceGatheringState::New),
                _ => None,
            };
            if let Some(mapped) = mapped {
                tracing::debug!(state = ?mapped, "ICE gathering state changed");
                state_tx.send_replace(mapped);
            }
            Box::pin(async {})
        }));

        Self { inner, ice_state }
    }

    fn codec_for(kind: TrackKind) -> RTCRtpCodecCapability {
        match kind {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                sdp_fmtp_line: String::new(),
                rtcp_feedback: vec![],
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                channels: 0,
                sdp_fmtp_line: String::new(),
                rtcp_feedback: vec![],
            },
        }
    }

    fn codec_type(kind: TrackKind) -> RTPCodecType {
        match kind {
            TrackKind::Audio => RTPCodecType::Audio,
            TrackKind::Video => RTPCodecType::Video,
        }
    }
}

#[async_trait]
impl PeerConnection for WebRtcPeerConnection {
    async fn add_track(&self, track: &MediaTrack, stream_id: &str) -> Result<()> {
        let local = Arc::new(TrackLocalStaticSample::new(
            Self::codec_for(track.kind()),
            track.id().to_owned(),
            stream_id.to_owned(),
        ));

        self.inner
            .add_track(local as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .map_err(|e| engine_error("Failed to add track", e))?;
        Ok(())
    }

    async fn add_recvonly_transceiver(&self, kind: TrackKind) -> Result<()> {
        self.inner
            .add_transceiver_from_kind(
                Self::codec_type(kind),
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Recvonly,
                    send_encodings: vec![],
                }),
            )
            .await
            .map_err(|e| engine_error("Failed to add transceiver", e))?;
        Ok(())
    }

    fn on_remote_track(&self, handler: RemoteTrackHandler) {
        self.inner
            .on_track(Box::new(move |track, _receiver, _transceiver| {
                let kind = match track.kind() {
                    RTPCodecType::Audio => Some(TrackKind::Audio),
                    RTPCodecType::Video => Some(TrackKind::Video),
                    _ => None,
                };
                if let Some(kind) = kind {
                    handler(MediaTrack::new(track.id(), kind));
                }
                Box::pin(async {})
            }));
    }

    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .inner
            .create_offer(None)
            .await
            .map_err(|e| engine_error("Failed to create offer", e))?;
        let sdp = offer.sdp.clone();

        self.inner
            .set_local_description(offer)
            .await
            .map_err(|e| engine_error("Failed to set local description", e))?;

        Ok(sdp)
    }

    async fn local_description(&self) -> Option<String> {
        self.inner.local_description().await.map(|desc| desc.sdp)
    }

    fn ice_gathering_state(&self) -> watch::Receiver<IceGatheringState> {
        self.ice_state.subscribe()
    }

    async fn set_remote_answer(&self, sdp: &str) -> Result<()> {
        let answer = RTCSessionDescription::answer(sdp.to_owned())
            .map_err(|e| engine_error("Failed to parse answer", e))?;

        self.inner
            .set_remote_description(answer)
            .await
            .map_err(|e| engine_error("Failed to set remote description", e))
    }

    async fn close(&self) -> Result<()> {
        self.inner
            .close()
            .await
            .map_err(|e| engine_error("Failed to close peer connection", e))
    }
}

/// Builds webrtc-rs peer connections with the default codec set
#[derive(Debug, Default)]
pub struct WebRtcPeerConnectionFactory;

impl WebRtcPeerConnectionFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PeerConnectionFactory for WebRtcPeerConnectionFactory {
    async fn create(&self, ice_servers: &[String]) -> Result<Arc<dyn PeerConnection>> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(|e| engine_error("Failed to register codecs", e))?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| engine_error("Failed to register interceptors", e))?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if ice_servers.is_empty() {
            Vec::new()
        } else {
            vec![RTCIceServer {
                urls: ice_servers.to_vec(),
                ..Default::default()
            }]
        };

        let peer = api
            .new_peer_connection(RTCConfiguration {
                ice_servers,
                ..Default::default()
            })
            .await
            .map_err(|e| engine_error("Failed to create peer connection", e))?;

        Ok(Arc::new(WebRtcPeerConnection::new(Arc::new(peer))))
    }
}

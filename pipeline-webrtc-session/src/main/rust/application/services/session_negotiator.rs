use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use super::wait_for_ice_gathering_complete;
use crate::domain::entities::MediaSession;
use crate::domain::errors::{Result, SessionError};
use crate::domain::ports::{
    MediaElement, MetricsReporter, PeerConnection, PeerConnectionFactory, SignalingClient,
};
use crate::domain::value_objects::{
    MediaStream, NegotiatorConfig, SessionRole, SessionState, TrackKind,
};

/// Options for tearing a session down
#[derive(Debug, Clone, Copy, Default)]
pub struct StopOptions {
    /// Also stop the tracks of the local media stream
    pub stop_tracks: bool,
}

/// Application service running one WHIP/WHEP offer/answer exchange and
/// owning the negotiated session until `stop()`.
///
/// A negotiator is owned by a single caller; `start` and `stop` take
/// `&mut self`. To abort a `start` from another task, take a
/// `cancellation_handle()` beforehand.
pub struct SessionNegotiator {
    config: NegotiatorConfig,
    peers: Arc<dyn PeerConnectionFactory>,
    signaling: Arc<dyn SignalingClient>,
    element: Option<Arc<dyn MediaElement>>,
    metrics: Arc<dyn MetricsReporter>,
    session: MediaSession,
    peer: Option<Arc<dyn PeerConnection>>,
    local_stream: Option<MediaStream>,
    remote_stream: Option<MediaStream>,
    cancel: CancellationToken,
}

impl SessionNegotiator {
    pub fn new(
        config: NegotiatorConfig,
        peers: Arc<dyn PeerConnectionFactory>,
        signaling: Arc<dyn SignalingClient>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        let session = MediaSession::new(config.role());
        Self {
            config,
            peers,
            signaling,
            element: None,
            metrics,
            session,
            peer: None,
            local_stream: None,
            remote_stream: None,
            cancel: CancellationToken::new(),
        }
    }

    /// WHIP publisher against `whip_url` with default settings
    pub fn publisher(
        whip_url: &str,
        peers: Arc<dyn PeerConnectionFactory>,
        signaling: Arc<dyn SignalingClient>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Result<Self> {
        let config = NegotiatorConfig::new(SessionRole::Publish, whip_url)?;
        Ok(Self::new(config, peers, signaling, metrics))
    }

    /// WHEP viewer against `whep_url` with default settings
    pub fn viewer(
        whep_url: &str,
        peers: Arc<dyn PeerConnectionFactory>,
        signaling: Arc<dyn SignalingClient>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Result<Self> {
        let config = NegotiatorConfig::new(SessionRole::View, whep_url)?;
        Ok(Self::new(config, peers, signaling, metrics))
    }

    /// Preview (publish) or playback (view) target
    pub fn with_element(mut self, element: Arc<dyn MediaElement>) -> Self {
        self.element = Some(element);
        self
    }

    pub fn config(&self) -> &NegotiatorConfig {
        &self.config
    }

    pub fn session(&self) -> &MediaSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn resource_url(&self) -> Option<&Url> {
        self.session.resource_url()
    }

    pub fn local_stream(&self) -> Option<&MediaStream> {
        self.local_stream.as_ref()
    }

    pub fn remote_stream(&self) -> Option<&MediaStream> {
        self.remote_stream.as_ref()
    }

    /// Token that aborts the next (or current) `start`
    pub fn cancellation_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Negotiate a session. On failure every owned resource is released and
    /// the negotiator is back to `Idle`.
    pub async fn start(&mut self, local_media: Option<MediaStream>) -> Result<()> {
        if !self.session.state().is_idle() {
            return Err(SessionError::AlreadyStarted);
        }
        if self.config.role() == SessionRole::Publish && local_media.is_none() {
            return Err(SessionError::MissingMediaSource);
        }

        self.session.begin_negotiation();
        self.metrics.report_state_change(&self.session.state());

        tracing::info!(
            session_id = %self.session.id(),
            role = %self.config.role(),
            endpoint = %self.config.signaling_url(),
            "Starting {} negotiation",
            self.config.role().protocol()
        );

        match self.negotiate(local_media).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %self.session.id(),
                    resource_url = ?self.session.resource_url().map(Url::as_str),
                    "Session active"
                );
                Ok(())
            }
            Err(e) => {
                if e.is_conflict() {
                    tracing::warn!(session_id = %self.session.id(), "Endpoint reported an active session");
                } else {
                    tracing::error!(session_id = %self.session.id(), error = %e, "Negotiation failed");
                }
                self.metrics.report_negotiation_failure(e.kind());

                self.release(false).await;
                self.session.reset(Some(e.to_string()));
                self.metrics.report_state_change(&self.session.state());
                Err(e)
            }
        }
    }

    async fn negotiate(&mut self, local_media: Option<MediaStream>) -> Result<()> {
        let cancel = self.cancel.clone();
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let peer = self.peers.create(self.config.ice_servers()).await?;
        self.peer = Some(Arc::clone(&peer));

        match self.config.role() {
            SessionRole::Publish => {
                let stream = local_media.ok_or(SessionError::MissingMediaSource)?;
                self.local_stream = Some(stream.clone());
                for track in stream.tracks() {
                    peer.add_track(&track, stream.id()).await?;
                }
                if let Some(element) = &self.element {
                    element.attach(&stream);
                }
            }
            SessionRole::View => {
                let remote = MediaStream::new();
                self.remote_stream = Some(remote.clone());
                if let Some(element) = &self.element {
                    element.attach(&remote);
                }

                peer.add_recvonly_transceiver(TrackKind::Video).await?;
                peer.add_recvonly_transceiver(TrackKind::Audio).await?;

                peer.on_remote_track(Box::new(move |track| {
                    tracing::debug!(track_id = %track.id(), kind = track.kind().as_str(), "Remote track");
                    remote.add_track(track);
                }));
            }
        }

        let offer = peer.create_offer().await?;
        self.session.set_local_description(offer.clone());

        tokio::select! {
            result = wait_for_ice_gathering_complete(
                peer.ice_gathering_state(),
                self.config.ice_gathering_timeout(),
            ) => result?,
            _ = cancel.cancelled() => return Err(SessionError::Cancelled),
        }

        // Gathered candidates are folded into the local description
        let local_sdp = peer.local_description().await.unwrap_or(offer);
        self.session.set_local_description(local_sdp.clone());

        let answer = self
            .signaling
            .exchange(self.config.signaling_url(), &local_sdp, cancel)
            .await?;

        if let Some(resource_url) = answer.resource_url {
            self.session.set_resource_url(resource_url);
        }

        peer.set_remote_answer(&answer.sdp).await?;
        self.session.activate(answer.sdp);
        self.metrics.report_state_change(&self.session.state());

        Ok(())
    }

    /// Tear the session down. Idempotent; failures are logged, never returned.
    pub async fn stop(&mut self, options: StopOptions) {
        if self.session.state().is_idle() && self.peer.is_none() {
            tracing::debug!("Session already stopped");
            return;
        }

        if let Some(uptime) = self.session.uptime() {
            self.metrics.report_uptime(uptime.as_secs_f64());
        }

        self.session.begin_closing(Some("Stopped by caller".to_string()));
        self.metrics.report_state_change(&self.session.state());

        tracing::info!(session_id = %self.session.id(), "Stopping session");
        self.release(options.stop_tracks).await;

        self.session.reset(Some("Stopped by caller".to_string()));
        self.metrics.report_state_change(&self.session.state());
    }

    /// Best-effort cleanup; each step runs regardless of earlier failures
    async fn release(&mut self, stop_tracks: bool) {
        self.cancel.cancel();

        if let Some(resource_url) = self.session.resource_url().cloned() {
            match self.signaling.delete_session(&resource_url).await {
                Ok(()) => {
                    tracing::debug!(resource_url = %resource_url, "Session resource deleted");
                    self.metrics.report_resource_delete(true);
                }
                Err(e) => {
                    tracing::warn!(resource_url = %resource_url, error = %e, "Failed to delete session resource");
                    self.metrics.report_resource_delete(false);
                }
            }
        }

        if let Some(peer) = self.peer.take() {
            if let Err(e) = peer.close().await {
                tracing::warn!(error = %e, "Failed to close peer connection");
            }
        }

        if stop_tracks {
            if let Some(stream) = &self.local_stream {
                stream.stop_all();
            }
        }

        if let Some(element) = &self.element {
            element.detach();
        }

        self.local_stream = None;
        self.remote_stream = None;
        self.cancel = CancellationToken::new();
    }
}

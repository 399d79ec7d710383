use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use pipeline_webrtc_session::{
    serve_metrics, Config, HttpSignalingClient, MediaStream, MediaTrack, PrometheusReporter,
    SessionError, SessionNegotiator, SessionRole, StopOptions, TrackKind, TracingElement,
    WebRtcPeerConnectionFactory,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    let negotiator_config = config.to_negotiator_config()?;
    let role = negotiator_config.role();

    info!("Starting {} session probe", role.protocol());
    info!("  Endpoint: {}", negotiator_config.signaling_url());
    info!("  ICE gathering timeout: {:?}", negotiator_config.ice_gathering_timeout());
    info!("  Metrics port: {}", config.metrics_port);

    // Start metrics server
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let metrics_server = tokio::spawn(serve_metrics(config.metrics_port, async {
        shutdown_rx.await.ok();
    }));

    // Create infrastructure implementations (dependency injection)
    let peers = Arc::new(WebRtcPeerConnectionFactory::new());
    let signaling = Arc::new(HttpSignalingClient::new());
    let metrics_reporter = Arc::new(PrometheusReporter::new());
    let element = Arc::new(TracingElement::new(match role {
        SessionRole::Publish => "preview",
        SessionRole::View => "player",
    }));

    let mut negotiator =
        SessionNegotiator::new(negotiator_config, peers, signaling, metrics_reporter)
            .with_element(element);

    let local_media = match role {
        SessionRole::Publish => Some(MediaStream::new().with_tracks(vec![
            MediaTrack::new("probe-audio", TrackKind::Audio),
            MediaTrack::new("probe-video", TrackKind::Video),
        ])),
        SessionRole::View => None,
    };

    // Ctrl+C during negotiation aborts it
    let cancel = negotiator.cancellation_handle();
    let abort_on_signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal during negotiation");
            cancel.cancel();
        }
    });

    let started = negotiator.start(local_media).await;
    abort_on_signal.abort();

    match started {
        Ok(()) => {
            info!("Session active, press Ctrl+C to stop");
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl+c: {}", e);
            }
            info!("Received shutdown signal");
        }
        Err(SessionError::Cancelled) => info!("Negotiation cancelled"),
        Err(e) => error!("{}", e.user_message()),
    }

    negotiator.stop(StopOptions { stop_tracks: true }).await;

    // Signal shutdown to metrics server
    let _ = shutdown_tx.send(());
    metrics_server.await?;

    info!("Session probe shutdown complete");
    Ok(())
}

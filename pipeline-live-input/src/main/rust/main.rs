use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use pipeline_live_input::{
    serve_api, serve_metrics, Config, EventNotifier, HttpStreamProvider, InMemoryCache,
    LiveInputRegistry, NotificationSink, PrometheusReporter, StreamControlService,
    WebhookNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    info!("Starting Pipeline-Live-Input v{}", env!("CARGO_PKG_VERSION"));

    // Validate CLI configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    // Convert CLI config to domain configs
    let server_config = config.to_server_config()?;
    let provider_config = config.to_provider_config()?;
    let webhook_config = config.to_webhook_config()?;

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        serve_metrics(metrics_port).await;
    });

    // Create infrastructure implementations (dependency injection)
    let metrics_reporter = Arc::new(PrometheusReporter::new());
    let provider = Arc::new(HttpStreamProvider::new(provider_config));
    let cache = Arc::new(InMemoryCache::new());
    let notifier = webhook_config
        .map(|webhook| Arc::new(WebhookNotifier::new(webhook)) as Arc<dyn EventNotifier>);

    // Create application services
    let registry = Arc::new(LiveInputRegistry::new(
        provider,
        cache,
        metrics_reporter.clone(),
    ));
    let sink = NotificationSink::new(
        notifier,
        server_config.service_name(),
        metrics_reporter,
    );
    let service = Arc::new(StreamControlService::new(registry, sink.clone()));

    info!("-------------------------------------------------------");
    info!("Live Input Manager Ready");
    info!("   API:           http://0.0.0.0:{}/stream", server_config.port());
    info!("   Stream API:    {}", config.stream_api_url);
    info!("   Notifications: {}", if sink.is_enabled() { "webhook" } else { "disabled" });
    info!("   Auth gate:     {}", server_config.access_token().is_some());
    info!("   Metrics:       http://0.0.0.0:{}/metrics", config.metrics_port);
    info!("-------------------------------------------------------");

    // Handle graceful shutdown
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received (Ctrl+C)"),
            Err(err) => error!("Failed to listen for shutdown signal: {}", err),
        }
    };

    serve_api(service, server_config, shutdown).await;

    info!("Server stopped gracefully");
    Ok(())
}

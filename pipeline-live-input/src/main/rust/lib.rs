pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::{
    Dispatched, LiveInputRegistry, NotificationSink, StreamControlService, ACTIVE_LIVE_INPUT_KEY,
};
pub use config::Config;
pub use domain::entities::LiveInput;
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{EventNotifier, KeyValueCache, MetricsReporter, StreamProvider};
pub use domain::value_objects::{
    ProviderConfig, ProvisionedInput, ServerConfig, StreamEvent, StreamStatus, StreamUrls,
    WebhookConfig,
};
pub use infrastructure::cache::InMemoryCache;
pub use infrastructure::http::{api_routes, serve_api};
pub use infrastructure::metrics::{metrics_routes, serve_metrics, PrometheusReporter};
pub use infrastructure::notifier::WebhookNotifier;
pub use infrastructure::provider::HttpStreamProvider;

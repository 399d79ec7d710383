mod event_notifier;
mod key_value_cache;
mod metrics_reporter;
mod stream_provider;

pub use event_notifier::EventNotifier;
pub use key_value_cache::KeyValueCache;
pub use metrics_reporter::MetricsReporter;
pub use stream_provider::StreamProvider;

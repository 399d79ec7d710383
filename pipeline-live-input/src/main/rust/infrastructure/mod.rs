pub mod cache;
pub mod http;
pub mod metrics;
pub mod notifier;
pub mod provider;

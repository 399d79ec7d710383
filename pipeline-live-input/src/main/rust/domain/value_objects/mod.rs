mod endpoint_config;
mod provisioned_input;
mod server_config;
mod stream_event;

pub use endpoint_config::{ProviderConfig, WebhookConfig};
pub use provisioned_input::ProvisionedInput;
pub use server_config::{ServerConfig, DEFAULT_SERVICE_NAME};
pub use stream_event::{StreamEvent, StreamStatus, StreamUrls};

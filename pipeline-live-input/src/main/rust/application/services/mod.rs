mod live_input_registry;
mod notification_sink;
mod stream_control_service;

pub use live_input_registry::{LiveInputRegistry, ACTIVE_LIVE_INPUT_KEY};
pub use notification_sink::NotificationSink;
pub use stream_control_service::{Dispatched, StreamControlService};

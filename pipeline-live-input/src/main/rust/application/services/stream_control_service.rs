use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{LiveInputRegistry, NotificationSink};
use crate::domain::entities::LiveInput;
use crate::domain::errors::Result;
use crate::domain::value_objects::{StreamEvent, StreamStatus};

/// Outcome of a control call plus the notification it dispatched, if any
pub struct Dispatched<T> {
    pub value: T,
    pub notification: Option<JoinHandle<()>>,
}

/// Publish / play / end use cases behind the HTTP surface
pub struct StreamControlService {
    registry: Arc<LiveInputRegistry>,
    sink: NotificationSink,
}

impl StreamControlService {
    pub fn new(registry: Arc<LiveInputRegistry>, sink: NotificationSink) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &LiveInputRegistry {
        &self.registry
    }

    /// Ensure a live input exists and announce it as live
    pub async fn publish(&self) -> Result<Dispatched<LiveInput>> {
        let input = self.registry.ensure().await?;
        let notification = self.sink.notify(self.sink.event(StreamStatus::Live, &input));
        Ok(Dispatched {
            value: input,
            notification,
        })
    }

    pub async fn play(&self) -> Result<LiveInput> {
        self.registry.ensure().await
    }

    /// End the active live input, if any. Returns whether one was ended.
    pub async fn end(&self) -> Dispatched<bool> {
        match self.registry.end_active().await {
            Some(id) => {
                let notification = self.sink.notify(StreamEvent::ended(self.sink.source(), id));
                Dispatched {
                    value: true,
                    notification,
                }
            }
            None => Dispatched {
                value: false,
                notification: None,
            },
        }
    }
}

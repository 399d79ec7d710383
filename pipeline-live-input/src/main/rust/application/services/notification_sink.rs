use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::entities::LiveInput;
use crate::domain::ports::{EventNotifier, MetricsReporter};
use crate::domain::value_objects::{StreamEvent, StreamStatus};

/// Best-effort, detached delivery of stream state changes.
///
/// `notify` never blocks or fails the caller: delivery runs on its own
/// tokio task and failures are only logged. The returned handle may be
/// awaited or dropped.
#[derive(Clone)]
pub struct NotificationSink {
    notifier: Option<Arc<dyn EventNotifier>>,
    source: String,
    metrics: Arc<dyn MetricsReporter>,
}

impl NotificationSink {
    pub fn new(
        notifier: Option<Arc<dyn EventNotifier>>,
        source: impl Into<String>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        Self {
            notifier,
            source: source.into(),
            metrics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn event(&self, status: StreamStatus, input: &LiveInput) -> StreamEvent {
        match status {
            StreamStatus::Live => StreamEvent::live(self.source.clone(), input),
            StreamStatus::Ended => StreamEvent::ended(self.source.clone(), input.id()),
        }
    }

    /// Dispatch `event`; `None` when no notifier is configured
    pub fn notify(&self, event: StreamEvent) -> Option<JoinHandle<()>> {
        let notifier = Arc::clone(self.notifier.as_ref()?);
        let metrics = Arc::clone(&self.metrics);

        Some(tokio::spawn(async move {
            match notifier.deliver(&event).await {
                Ok(()) => {
                    tracing::debug!(
                        status = event.status.as_str(),
                        resource_id = %event.resource_id,
                        "Notification delivered"
                    );
                    metrics.report_notification(true);
                }
                Err(e) => {
                    tracing::warn!(
                        status = event.status.as_str(),
                        resource_id = %event.resource_id,
                        error = %e,
                        "Notification failed"
                    );
                    metrics.report_notification(false);
                }
            }
        }))
    }
}

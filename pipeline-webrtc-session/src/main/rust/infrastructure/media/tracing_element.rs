use crate::domain::ports::MediaElement;
use crate::domain::value_objects::MediaStream;

/// Headless media element that only logs bindings
#[derive(Debug, Default)]
pub struct TracingElement {
    name: String,
}

impl TracingElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MediaElement for TracingElement {
    fn attach(&self, stream: &MediaStream) {
        tracing::info!(
            element = %self.name,
            stream_id = %stream.id(),
            tracks = stream.track_count(),
            "Stream bound (muted, inline)"
        );
    }

    fn detach(&self) {
        tracing::info!(element = %self.name, "Stream unbound");
    }
}

use crate::domain::value_objects::MediaStream;

/// Port for the preview or playback target a stream is bound to
pub trait MediaElement: Send + Sync {
    /// Bind a stream for muted, inline playback
    fn attach(&self, stream: &MediaStream);

    fn detach(&self);
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

/// A single audio or video track; clones share the live flag
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: String,
    kind: TrackKind,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

/// Group of tracks bound to one preview or playback target.
///
/// Clones share the track list, so tracks added by the media engine after
/// binding are visible to every holder.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Arc<Mutex<Vec<MediaTrack>>>,
}

impl MediaStream {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tracks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_tracks(mut self, tracks: Vec<MediaTrack>) -> Self {
        self.tracks = Arc::new(Mutex::new(tracks));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_track(&self, track: MediaTrack) {
        self.tracks.lock().push(track);
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.lock().clone()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.lock().len()
    }

    pub fn stop_all(&self) {
        for track in self.tracks.lock().iter() {
            track.stop();
        }
    }
}

impl Default for MediaStream {
    fn default() -> Self {
        Self::new()
    }
}

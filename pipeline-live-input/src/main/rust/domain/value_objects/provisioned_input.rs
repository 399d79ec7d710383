use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entities::LiveInput;
use crate::domain::errors::{DomainError, Result};

/// Fields read from a provider's create-live-input response, before
/// validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvisionedInput {
    pub uid: Option<String>,
    pub ingest_url: Option<String>,
    pub playback_url: Option<String>,
}

impl ProvisionedInput {
    pub fn new(uid: &str, ingest_url: &str, playback_url: &str) -> Self {
        Self {
            uid: Some(uid.to_string()),
            ingest_url: Some(ingest_url.to_string()),
            playback_url: Some(playback_url.to_string()),
        }
    }

    /// Accepts `{uid, webRTC: {url}, webRTCPlayback: {url}}`, bare or inside a
    /// `{result: ...}` envelope
    pub fn from_json(body: &Value) -> Self {
        let input = body.get("result").filter(|v| v.is_object()).unwrap_or(body);
        let text = |pointer: &str| {
            input
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            uid: text("/uid"),
            ingest_url: text("/webRTC/url"),
            playback_url: text("/webRTCPlayback/url"),
        }
    }

    pub fn into_live_input(self, created_at: DateTime<Utc>) -> Result<LiveInput> {
        fn required(value: Option<String>, field: &str) -> Result<String> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DomainError::Shape(format!("missing {}", field)))
        }

        let uid = required(self.uid, "uid")?;
        let ingest_url = required(self.ingest_url, "webRTC.url")?;
        let playback_url = required(self.playback_url, "webRTCPlayback.url")?;

        Ok(LiveInput::new(uid, ingest_url, playback_url, created_at))
    }
}

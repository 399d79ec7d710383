use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The single active live input: one WHIP ingest URL and one WHEP playback
/// URL. Immutable once created; replaced only after it is ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveInput {
    #[serde(default)]
    id: String,
    #[serde(default)]
    ingest_url: String,
    #[serde(default)]
    playback_url: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<DateTime<Utc>>,
}

/// Entries written by other producers may carry epoch millis or no usable
/// timestamp at all; neither makes the entry invalid.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

impl LiveInput {
    pub fn new(
        id: impl Into<String>,
        ingest_url: impl Into<String>,
        playback_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            ingest_url: ingest_url.into(),
            playback_url: playback_url.into(),
            created_at: Some(created_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// WHIP endpoint
    pub fn ingest_url(&self) -> &str {
        &self.ingest_url
    }

    /// WHEP endpoint
    pub fn playback_url(&self) -> &str {
        &self.playback_url
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// All identifying fields are present
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.ingest_url.is_empty() && !self.playback_url.is_empty()
    }
}

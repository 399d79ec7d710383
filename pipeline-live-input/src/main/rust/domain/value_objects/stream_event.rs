use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::LiveInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Live,
    Ended,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Live => "live",
            StreamStatus::Ended => "ended",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whep: Option<String>,
}

/// State-change notification payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    pub source: String,
    pub status: StreamStatus,
    pub resource_id: String,
    pub urls: StreamUrls,
    pub timestamp: DateTime<Utc>,
}

impl StreamEvent {
    /// A live input started accepting a publisher
    pub fn live(source: impl Into<String>, input: &LiveInput) -> Self {
        Self {
            source: source.into(),
            status: StreamStatus::Live,
            resource_id: input.id().to_string(),
            urls: StreamUrls {
                whip: Some(input.ingest_url().to_string()),
                whep: Some(input.playback_url().to_string()),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn ended(source: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: StreamStatus::Ended,
            resource_id: resource_id.into(),
            urls: StreamUrls::default(),
            timestamp: Utc::now(),
        }
    }
}

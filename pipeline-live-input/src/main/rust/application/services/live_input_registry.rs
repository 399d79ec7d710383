use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::LiveInput;
use crate::domain::errors::Result;
use crate::domain::ports::{KeyValueCache, MetricsReporter, StreamProvider};

/// Cache key holding the JSON-serialized active live input
pub const ACTIVE_LIVE_INPUT_KEY: &str = "active_live_input";

/// Maintains at most one active live input in the shared cache.
///
/// `ensure` is a read-check-create sequence without locking: two concurrent
/// callers on an empty cache can both provision an input, and the last
/// cache write wins. The orphaned input is left to the provider.
pub struct LiveInputRegistry {
    provider: Arc<dyn StreamProvider>,
    cache: Arc<dyn KeyValueCache>,
    metrics: Arc<dyn MetricsReporter>,
}

impl LiveInputRegistry {
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        cache: Arc<dyn KeyValueCache>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        Self {
            provider,
            cache,
            metrics,
        }
    }

    /// Return the cached live input, creating one when the cache holds
    /// nothing usable
    pub async fn ensure(&self) -> Result<LiveInput> {
        if let Some(input) = self.current().await? {
            tracing::debug!(live_input_id = %input.id(), "Reusing active live input");
            self.metrics.report_live_input_reused();
            return Ok(input);
        }

        self.create().await
    }

    /// Cached live input, if present and complete. Never provisions.
    pub async fn current(&self) -> Result<Option<LiveInput>> {
        let Some(raw) = self.cache.get(ACTIVE_LIVE_INPUT_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<LiveInput>(&raw) {
            Ok(input) if input.is_complete() => Ok(Some(input)),
            Ok(_) => {
                tracing::debug!("Cached live input is incomplete, ignoring");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached live input is unparsable, ignoring");
                Ok(None)
            }
        }
    }

    /// Provision a new live input and make it the active one
    pub async fn create(&self) -> Result<LiveInput> {
        let provisioned = match self.provider.create_live_input().await {
            Ok(provisioned) => provisioned,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create live input");
                self.metrics.report_provider_failure();
                return Err(e);
            }
        };

        let input = provisioned.into_live_input(Utc::now()).map_err(|e| {
            tracing::error!(error = %e, "Stream API returned a malformed live input");
            self.metrics.report_provider_failure();
            e
        })?;

        let serialized = serde_json::to_string(&input)?;
        self.cache.put(ACTIVE_LIVE_INPUT_KEY, serialized).await?;

        tracing::info!(
            live_input_id = %input.id(),
            ingest_url = %input.ingest_url(),
            "Live input created"
        );
        self.metrics.report_live_input_created(&input);

        Ok(input)
    }

    /// Tear down a live input. Provider and cache failures are logged; the
    /// cache entry is removed regardless of the provider outcome.
    pub async fn end(&self, id: &str) {
        if let Err(e) = self.provider.delete_live_input(id).await {
            tracing::warn!(live_input_id = %id, error = %e, "Failed to delete live input at provider");
            self.metrics.report_provider_failure();
        }

        if let Err(e) = self.cache.delete(ACTIVE_LIVE_INPUT_KEY).await {
            tracing::warn!(live_input_id = %id, error = %e, "Failed to clear cached live input");
        }

        tracing::info!(live_input_id = %id, "Live input ended");
        self.metrics.report_live_input_ended();
    }

    /// End whatever the cache currently points at. Any entry carrying an id
    /// is ended even if incomplete; an entry without one is only cleared.
    /// Returns the ended id.
    pub async fn end_active(&self) -> Option<String> {
        let raw = match self.cache.get(ACTIVE_LIVE_INPUT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read active live input");
                self.clear().await;
                return None;
            }
        };

        let id = serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .and_then(|entry| entry.get("id")?.as_str().map(str::to_owned))
            .filter(|id| !id.is_empty());

        match id {
            Some(id) => {
                self.end(&id).await;
                Some(id)
            }
            None => {
                tracing::warn!("Cached live input has no id, clearing it");
                self.clear().await;
                None
            }
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.cache.delete(ACTIVE_LIVE_INPUT_KEY).await {
            tracing::warn!(error = %e, "Failed to clear cached live input");
        }
    }
}

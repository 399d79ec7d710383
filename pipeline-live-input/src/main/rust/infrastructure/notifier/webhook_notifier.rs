use async_trait::async_trait;

use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::EventNotifier;
use crate::domain::value_objects::{StreamEvent, WebhookConfig};

/// Posts events as JSON with bearer authentication
pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EventNotifier for WebhookNotifier {
    async fn deliver(&self, event: &StreamEvent) -> Result<()> {
        let response = self
            .client
            .post(self.config.url().clone())
            .bearer_auth(self.config.token())
            .json(event)
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DomainError::Webhook {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        Ok(())
    }
}

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::StreamProvider;
use crate::domain::value_objects::{ProviderConfig, ProvisionedInput};

/// Stream provider speaking the Cloudflare Stream live-input API
pub struct HttpStreamProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpStreamProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    async fn api_error(response: reqwest::Response) -> DomainError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        DomainError::StreamApi {
            status,
            message: message.trim().to_string(),
        }
    }
}

#[async_trait]
impl StreamProvider for HttpStreamProvider {
    async fn create_live_input(&self) -> Result<ProvisionedInput> {
        let url = self.config.live_inputs_url();
        tracing::debug!(url = %url, "Creating live input");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_token())
            .json(&json!({ "recording": { "mode": "automatic" } }))
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DomainError::Shape(format!("invalid JSON body: {}", e)))?;

        Ok(ProvisionedInput::from_json(&body))
    }

    async fn delete_live_input(&self, id: &str) -> Result<()> {
        let url = self.config.live_input_url(id);
        tracing::debug!(url = %url, "Deleting live input");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(self.config.api_token())
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        // Already gone counts as deleted
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(Self::api_error(response).await)
    }
}

use url::Url;

use crate::domain::errors::{DomainError, Result};

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| DomainError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DomainError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, other
        ))),
    }
}

/// Stream provider account endpoint and API token
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    base_url: Url,
    api_token: String,
}

impl ProviderConfig {
    pub fn new(base_url: &str, api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(DomainError::MissingCredential("stream API token"));
        }

        Ok(Self {
            base_url: parse_http_url(base_url)?,
            api_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn live_inputs_url(&self) -> String {
        format!("{}/live_inputs", self.base_url.as_str().trim_end_matches('/'))
    }

    pub fn live_input_url(&self, id: &str) -> String {
        format!("{}/{}", self.live_inputs_url(), id)
    }
}

/// Webhook receiving stream state changes
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    url: Url,
    token: String,
}

impl WebhookConfig {
    pub fn new(url: &str, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(DomainError::MissingCredential("webhook token"));
        }

        Ok(Self {
            url: parse_http_url(url)?,
            token,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

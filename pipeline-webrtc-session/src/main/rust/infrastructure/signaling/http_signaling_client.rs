use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::domain::errors::{Result, SessionError};
use crate::domain::ports::{SdpAnswer, SignalingClient};

pub const SDP_CONTENT_TYPE: &str = "application/sdp";

/// WHIP/WHEP signaling over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpSignalingClient {
    client: reqwest::Client,
}

impl HttpSignalingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Resolve a `Location` header value against the endpoint it came from
pub fn resolve_resource_url(endpoint: &Url, location: &str) -> Option<Url> {
    endpoint.join(location).ok()
}

#[async_trait]
impl SignalingClient for HttpSignalingClient {
    async fn exchange(
        &self,
        endpoint: &Url,
        offer_sdp: &str,
        cancel: CancellationToken,
    ) -> Result<SdpAnswer> {
        tracing::debug!(endpoint = %endpoint, bytes = offer_sdp.len(), "POST SDP offer");

        let request = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, SDP_CONTENT_TYPE)
            .body(offer_sdp.to_owned())
            .send();

        let response = tokio::select! {
            response = request => response.map_err(|e| SessionError::Negotiation(e.to_string()))?,
            _ = cancel.cancelled() => return Err(SessionError::Cancelled),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::sdp_exchange(status.as_u16(), &body));
        }

        let resource_url = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| resolve_resource_url(endpoint, location));

        let sdp = tokio::select! {
            body = response.text() => body.map_err(|e| SessionError::Negotiation(e.to_string()))?,
            _ = cancel.cancelled() => return Err(SessionError::Cancelled),
        };

        tracing::debug!(status = status.as_u16(), resource_url = ?resource_url.as_ref().map(Url::as_str), "SDP answer received");

        Ok(SdpAnswer { sdp, resource_url })
    }

    async fn delete_session(&self, resource_url: &Url) -> Result<()> {
        let response = self
            .client
            .delete(resource_url.clone())
            .send()
            .await
            .map_err(|e| SessionError::Negotiation(e.to_string()))?;

        let status = response.status();
        // Already gone counts as deleted
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SessionError::sdp_exchange(status.as_u16(), &body))
    }
}

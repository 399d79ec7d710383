use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::domain::errors::Result;

/// Answer returned by a WHIP/WHEP endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SdpAnswer {
    pub sdp: String,
    /// Absolute session-resource URL, when the endpoint supplied `Location`
    pub resource_url: Option<Url>,
}

/// Port for the HTTP signaling exchange
#[async_trait]
pub trait SignalingClient: Send + Sync {
    /// POST the offer; non-2xx responses map to `SessionError::SdpExchange`
    async fn exchange(
        &self,
        endpoint: &Url,
        offer_sdp: &str,
        cancel: CancellationToken,
    ) -> Result<SdpAnswer>;

    /// DELETE a previously negotiated session resource
    async fn delete_session(&self, resource_url: &Url) -> Result<()>;
}

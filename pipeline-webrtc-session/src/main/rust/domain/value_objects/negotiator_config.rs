use std::time::Duration;

use url::Url;

use super::SessionRole;
use crate::domain::errors::{Result, SessionError};

/// Default bound on waiting for ICE gathering to complete
pub const DEFAULT_ICE_GATHERING_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration for one WHIP or WHEP negotiator
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatorConfig {
    role: SessionRole,
    signaling_url: Url,
    ice_gathering_timeout: Duration,
    ice_servers: Vec<String>,
}

impl NegotiatorConfig {
    pub fn new(role: SessionRole, signaling_url: &str) -> Result<Self> {
        let signaling_url = Self::parse_signaling_url(signaling_url)?;

        Ok(Self {
            role,
            signaling_url,
            ice_gathering_timeout: DEFAULT_ICE_GATHERING_TIMEOUT,
            ice_servers: Vec::new(),
        })
    }

    pub fn with_ice_gathering_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(SessionError::InvalidIceTimeout);
        }
        self.ice_gathering_timeout = timeout;
        Ok(self)
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<String>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn signaling_url(&self) -> &Url {
        &self.signaling_url
    }

    pub fn ice_gathering_timeout(&self) -> Duration {
        self.ice_gathering_timeout
    }

    pub fn ice_servers(&self) -> &[String] {
        &self.ice_servers
    }

    fn parse_signaling_url(url: &str) -> Result<Url> {
        let parsed =
            Url::parse(url).map_err(|_| SessionError::InvalidSignalingUrl(url.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(SessionError::InvalidSignalingUrl(url.to_string())),
        }
    }
}

use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_SERVICE_NAME: &str = "pipeline-live-input";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    port: u16,
    access_token: Option<String>,
    service_name: String,
}

impl ServerConfig {
    pub fn new(port: u16) -> Result<Self> {
        Self::validate_port(port)?;

        Ok(Self {
            port,
            access_token: None,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        })
    }

    /// Require `Authorization: Bearer <token>` on `/stream/*`
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(DomainError::InvalidPort);
        }
        Ok(())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid port: port cannot be zero")]
    InvalidPort,

    #[error("Port {0} requires root privileges")]
    PortRequiresRoot(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Unexpected stream API response: {0}")]
    Shape(String),

    #[error("Stream API returned HTTP {status}: {message}")]
    StreamApi { status: u16, message: String },

    #[error("Webhook returned HTTP {status}: {message}")]
    Webhook { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Failure caused by the upstream stream provider rather than local state
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Shape(_) | Self::StreamApi { .. } | Self::Transport(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

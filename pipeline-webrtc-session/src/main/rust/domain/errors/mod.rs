use std::time::Duration;

use thiserror::Error;

/// HTTP status a signaling endpoint uses to say a session is already active
pub const CONFLICT_STATUS: u16 = 409;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid signaling URL: {0}")]
    InvalidSignalingUrl(String),

    #[error("Invalid ICE gathering timeout: must be greater than zero")]
    InvalidIceTimeout,

    #[error("Missing local media stream for publish")]
    MissingMediaSource,

    #[error("Session already started")]
    AlreadyStarted,

    #[error("Negotiation failed: {0}")]
    Negotiation(String),

    #[error("{message}")]
    SdpExchange { status: u16, message: String },

    #[error("Timed out waiting for ICE gathering after {0:?}")]
    IceGatheringTimeout(Duration),

    #[error("Peer connection error: {0}")]
    PeerConnection(String),

    #[error("Negotiation cancelled")]
    Cancelled,
}

/// Closed set of failure kinds callers switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Misuse,
    Negotiation,
    SdpExchange,
    Timeout,
    PeerConnection,
    Cancelled,
}

impl SessionError {
    pub fn sdp_exchange(status: u16, body: &str) -> Self {
        let message = format!("SDP exchange failed: HTTP {} {}", status, body)
            .trim()
            .to_string();
        Self::SdpExchange { status, message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignalingUrl(_) | Self::InvalidIceTimeout => ErrorKind::Config,
            Self::MissingMediaSource | Self::AlreadyStarted => ErrorKind::Misuse,
            Self::Negotiation(_) => ErrorKind::Negotiation,
            Self::SdpExchange { .. } => ErrorKind::SdpExchange,
            Self::IceGatheringTimeout(_) => ErrorKind::Timeout,
            Self::PeerConnection(_) => ErrorKind::PeerConnection,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// HTTP status of a failed signaling exchange
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SdpExchange { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The endpoint reported an already-active session
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(CONFLICT_STATUS)
    }

    /// Message suitable for showing to a publisher or viewer
    pub fn user_message(&self) -> String {
        if self.is_conflict() {
            return "Not live yet, try again shortly.".to_string();
        }
        format!("Stream negotiation failed ({})", self)
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

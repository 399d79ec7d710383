use std::fmt;

/// Negotiation states of a media session (pure domain)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not started, or fully torn down
    Idle,
    /// Offer/answer exchange in progress
    Negotiating,
    /// Both descriptions applied
    Active,
    /// Teardown in progress
    Closing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Negotiating => write!(f, "NEGOTIATING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Closing => write!(f, "CLOSING"),
        }
    }
}

impl SessionState {
    /// Convert state to numeric value for metrics
    pub fn as_metric(&self) -> f64 {
        match self {
            Self::Idle => 0.0,
            Self::Negotiating => 1.0,
            Self::Active => 2.0,
            Self::Closing => 3.0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the state machine allows moving to `next`
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Negotiating)
                | (Self::Negotiating, Self::Active)
                | (Self::Negotiating, Self::Idle)
                | (Self::Negotiating, Self::Closing)
                | (Self::Active, Self::Closing)
                | (Self::Closing, Self::Idle)
        )
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

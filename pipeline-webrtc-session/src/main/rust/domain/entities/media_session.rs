use std::time::Instant;

use url::Url;
use uuid::Uuid;

use crate::domain::value_objects::{SessionRole, SessionState};

/// State transition record
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: SessionState,
    pub to: SessionState,
    pub timestamp: Instant,
    pub reason: Option<String>,
}

/// Domain entity tracking one negotiation from offer to teardown
#[derive(Debug)]
pub struct MediaSession {
    id: String,
    role: SessionRole,
    state: SessionState,
    local_description: Option<String>,
    remote_description: Option<String>,
    resource_url: Option<Url>,
    state_history: Vec<StateTransition>,
    active_since: Option<Instant>,
}

impl MediaSession {
    pub fn new(role: SessionRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            state: SessionState::Idle,
            local_description: None,
            remote_description: None,
            resource_url: None,
            state_history: Vec::new(),
            active_since: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local_description(&self) -> Option<&str> {
        self.local_description.as_deref()
    }

    pub fn remote_description(&self) -> Option<&str> {
        self.remote_description.as_deref()
    }

    pub fn resource_url(&self) -> Option<&Url> {
        self.resource_url.as_ref()
    }

    pub fn uptime(&self) -> Option<std::time::Duration> {
        self.active_since.map(|start| start.elapsed())
    }

    pub fn transition_count(&self) -> usize {
        self.state_history.len()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }

    /// Start a fresh negotiation; a new id is minted and the history of the
    /// previous attempt is dropped
    pub fn begin_negotiation(&mut self) {
        self.id = Uuid::new_v4().to_string();
        self.state_history.clear();
        self.record_transition(SessionState::Negotiating, None);
    }

    pub fn set_local_description(&mut self, sdp: String) {
        self.local_description = Some(sdp);
    }

    /// Record the teardown URL. Only the first value of a negotiation sticks.
    pub fn set_resource_url(&mut self, url: Url) -> bool {
        if self.resource_url.is_some() {
            return false;
        }
        self.resource_url = Some(url);
        true
    }

    /// Remote answer applied; the session is live
    pub fn activate(&mut self, remote_sdp: String) {
        self.remote_description = Some(remote_sdp);
        self.record_transition(SessionState::Active, None);
        self.active_since = Some(Instant::now());
    }

    pub fn begin_closing(&mut self, reason: Option<String>) {
        self.record_transition(SessionState::Closing, reason);
    }

    /// Clear every negotiated field and return to idle
    pub fn reset(&mut self, reason: Option<String>) {
        self.local_description = None;
        self.remote_description = None;
        self.resource_url = None;
        self.active_since = None;
        self.record_transition(SessionState::Idle, reason);
    }

    fn record_transition(&mut self, new_state: SessionState, reason: Option<String>) {
        if self.state == new_state {
            return;
        }
        if !self.state.can_transition_to(new_state) {
            tracing::warn!(
                session_id = %self.id,
                from = %self.state,
                to = %new_state,
                "Unexpected session state transition"
            );
        }

        let transition = StateTransition {
            from: self.state,
            to: new_state,
            timestamp: Instant::now(),
            reason,
        };

        self.state_history.push(transition);
        self.state = new_state;
    }
}

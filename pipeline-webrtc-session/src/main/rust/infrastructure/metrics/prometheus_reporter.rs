use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::errors::ErrorKind;
use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::SessionState;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Session state (0=Idle, 1=Negotiating, 2=Active, 3=Closing)
    pub static ref SESSION_STATE: Gauge = Gauge::new(
        "webrtc_session_state",
        "Current media session state"
    ).expect("metric can be created");

    // Failed negotiations by error kind
    pub static ref NEGOTIATION_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("webrtc_negotiation_failures_total", "Failed WHIP/WHEP negotiations"),
        &["kind"]
    ).expect("metric can be created");

    pub static ref RESOURCE_DELETES: IntCounter = IntCounter::new(
        "webrtc_session_deletes_total",
        "Session resource DELETE requests that succeeded"
    ).expect("metric can be created");

    pub static ref RESOURCE_DELETE_FAILURES: IntCounter = IntCounter::new(
        "webrtc_session_delete_failures_total",
        "Session resource DELETE requests that failed"
    ).expect("metric can be created");

    pub static ref SESSION_UPTIME_SECONDS: Gauge = Gauge::new(
        "webrtc_session_uptime_seconds",
        "Uptime of the last session when it was stopped"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(SESSION_STATE.clone()))?;
        REGISTRY.register(Box::new(NEGOTIATION_FAILURES.clone()))?;
        REGISTRY.register(Box::new(RESOURCE_DELETES.clone()))?;
        REGISTRY.register(Box::new(RESOURCE_DELETE_FAILURES.clone()))?;
        REGISTRY.register(Box::new(SESSION_UPTIME_SECONDS.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }

    fn kind_label(kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::Config => "config",
            ErrorKind::Misuse => "misuse",
            ErrorKind::Negotiation => "negotiation",
            ErrorKind::SdpExchange => "sdp_exchange",
            ErrorKind::Timeout => "timeout",
            ErrorKind::PeerConnection => "peer_connection",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_state_change(&self, state: &SessionState) {
        SESSION_STATE.set(state.as_metric());
    }

    fn report_negotiation_failure(&self, kind: ErrorKind) {
        NEGOTIATION_FAILURES
            .with_label_values(&[Self::kind_label(kind)])
            .inc();
    }

    fn report_resource_delete(&self, succeeded: bool) {
        if succeeded {
            RESOURCE_DELETES.inc();
        } else {
            RESOURCE_DELETE_FAILURES.inc();
        }
    }

    fn report_uptime(&self, uptime_secs: f64) {
        SESSION_UPTIME_SECONDS.set(uptime_secs);
    }
}

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::domain::entities::LiveInput;
use crate::domain::ports::MetricsReporter;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_LIVE_INPUTS: IntGauge = IntGauge::new(
        "live_input_active",
        "Whether a live input is currently provisioned (0 or 1)"
    ).expect("metric can be created");
    pub static ref LIVE_INPUTS_CREATED: IntCounter = IntCounter::new(
        "live_inputs_created_total",
        "Live inputs provisioned at the stream provider"
    ).expect("metric can be created");
    pub static ref LIVE_INPUTS_REUSED: IntCounter = IntCounter::new(
        "live_inputs_reused_total",
        "Requests served from the cached live input"
    ).expect("metric can be created");
    pub static ref PROVIDER_FAILURES: IntCounter = IntCounter::new(
        "stream_provider_failures_total",
        "Failed or malformed stream provider calls"
    ).expect("metric can be created");
    pub static ref NOTIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("stream_notifications_total", "Webhook notifications by outcome"),
        &["outcome"]
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(ACTIVE_LIVE_INPUTS.clone()))?;
        REGISTRY.register(Box::new(LIVE_INPUTS_CREATED.clone()))?;
        REGISTRY.register(Box::new(LIVE_INPUTS_REUSED.clone()))?;
        REGISTRY.register(Box::new(PROVIDER_FAILURES.clone()))?;
        REGISTRY.register(Box::new(NOTIFICATIONS.clone()))?;
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
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_live_input_created(&self, _input: &LiveInput) {
        LIVE_INPUTS_CREATED.inc();
        ACTIVE_LIVE_INPUTS.set(1);
    }

    fn report_live_input_reused(&self) {
        LIVE_INPUTS_REUSED.inc();
        ACTIVE_LIVE_INPUTS.set(1);
    }

    fn report_live_input_ended(&self) {
        ACTIVE_LIVE_INPUTS.set(0);
    }

    fn report_provider_failure(&self) {
        PROVIDER_FAILURES.inc();
    }

    fn report_notification(&self, delivered: bool) {
        let outcome = if delivered { "delivered" } else { "failed" };
        NOTIFICATIONS.with_label_values(&[outcome]).inc();
    }
}

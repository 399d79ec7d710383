use crate::domain::errors::ErrorKind;
use crate::domain::value_objects::SessionState;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_state_change(&self, state: &SessionState);
    fn report_negotiation_failure(&self, kind: ErrorKind);
    fn report_resource_delete(&self, succeeded: bool);
    fn report_uptime(&self, uptime_secs: f64);
}

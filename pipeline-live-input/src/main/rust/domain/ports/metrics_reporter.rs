use crate::domain::entities::LiveInput;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_live_input_created(&self, input: &LiveInput);
    fn report_live_input_reused(&self);
    fn report_live_input_ended(&self);
    fn report_provider_failure(&self);
    fn report_notification(&self, delivered: bool);
}

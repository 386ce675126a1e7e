//! Alert emission port
//!
//! The over-threshold decision lives in the tracker; emission goes through
//! the [`AlertSink`] port so the decision logic stays testable without
//! triggering real notifications. Alerts are not deduplicated across
//! cycles: an endpoint that stays over threshold fires one alert per cycle.

use tracing::error;

/// One-way notification sink for endpoint alerts
pub trait AlertSink: Send + Sync {
    /// Emit an alert for `url` after `failure_count` windowed failures
    fn notify(&self, url: &str, failure_count: u32);
}

/// Alert sink that emits to the log
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, url: &str, failure_count: u32) {
        error!(
            url = %url,
            failure_count,
            "Alert has been triggered for endpoint failure"
        );
    }
}

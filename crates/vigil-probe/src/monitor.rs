//! Probe cycle orchestration

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use vigil_core::{
    CycleReport, EndpointReport, FailureRecordView, HealthVerdict, MonitorSettings, VigilError,
    VigilResult,
};

use crate::aggregate::unhealthy_percentage;
use crate::alert::AlertSink;
use crate::prober::Prober;
use crate::tracker::FailureTracker;

/// Orchestrates probing, failure tracking, alerting, and the fleet verdict.
///
/// Owns the failure tracker; concurrent cycles from the request layer share
/// it behind a lock, so out-of-order completions cannot race on a record.
pub struct HealthMonitor {
    /// Resolved thresholds and endpoint list
    settings: MonitorSettings,
    /// Probe implementation
    prober: Arc<dyn Prober>,
    /// Notification port for endpoint alerts
    alert_sink: Arc<dyn AlertSink>,
    /// Failure history, keyed by URL
    tracker: RwLock<FailureTracker>,
}

impl HealthMonitor {
    /// Create a new monitor over the given settings
    pub fn new(
        settings: MonitorSettings,
        prober: Arc<dyn Prober>,
        alert_sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            settings,
            prober,
            alert_sink,
            tracker: RwLock::new(FailureTracker::new()),
        }
    }

    /// The resolved monitor settings
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run one full probing cycle over every configured endpoint.
    ///
    /// When `cycle_timeout_secs` is nonzero the probing pass is bounded by
    /// that deadline so one stalled endpoint cannot block the verdict
    /// indefinitely.
    pub async fn run_cycle(&self) -> VigilResult<CycleReport> {
        let reports = if self.settings.cycle_timeout_secs == 0 {
            self.probe_all().await
        } else {
            let deadline = Duration::from_secs(self.settings.cycle_timeout_secs);
            tokio::time::timeout(deadline, self.probe_all())
                .await
                .map_err(|_| {
                    VigilError::Internal(format!(
                        "probing cycle exceeded its {}s deadline",
                        self.settings.cycle_timeout_secs
                    ))
                })?
        };

        let urls: Vec<String> = self
            .settings
            .endpoints
            .iter()
            .map(|e| e.url.clone())
            .collect();

        let percentage = {
            let tracker = self.tracker.read().await;
            unhealthy_percentage(&tracker, &urls, self.settings.failed_url_threshold_count)?
        };

        let verdict = if percentage > self.settings.unhealthy_status_threshold_percentage {
            error!(
                unhealthy_percentage = percentage,
                threshold = self.settings.unhealthy_status_threshold_percentage,
                "HealthCheck failed"
            );
            HealthVerdict::Unhealthy
        } else {
            debug!(unhealthy_percentage = percentage, "HealthCheck passed");
            HealthVerdict::Healthy
        };

        Ok(CycleReport {
            verdict,
            unhealthy_percentage: percentage,
            endpoints: reports,
        })
    }

    /// Probe every endpoint in configuration order and feed the tracker.
    ///
    /// Thresholds are taken from the settings resolved at construction, so
    /// one cycle always sees one consistent set.
    async fn probe_all(&self) -> Vec<EndpointReport> {
        let window_secs = self.settings.failed_duration_secs;
        let threshold_count = self.settings.failed_url_threshold_count;

        let mut reports = Vec::with_capacity(self.settings.endpoints.len());

        for endpoint in &self.settings.endpoints {
            let outcome = self.prober.probe(&endpoint.url).await;
            let failed = outcome.is_failure(endpoint.response_timeout_threshold_ms);

            let (failure_count, alerted) = if failed {
                warn!(url = %endpoint.url, "Adding failed url to the errored endpoint list");
                let (count, alert) = {
                    let mut tracker = self.tracker.write().await;
                    let count = tracker.record_failure(&endpoint.url, Utc::now(), window_secs);
                    (count, tracker.is_over_threshold(&endpoint.url, threshold_count))
                };
                if alert {
                    self.alert_sink.notify(&endpoint.url, count);
                }
                (count, alert)
            } else {
                (self.tracker.read().await.failure_count(&endpoint.url), false)
            };

            reports.push(EndpointReport {
                url: endpoint.url.clone(),
                elapsed_ms: outcome.elapsed_ms,
                status_code: outcome.status_code,
                failed,
                failure_count,
                alerted,
            });
        }

        reports
    }

    /// Read-only view of the tracked failure records
    pub async fn snapshot(&self) -> Vec<FailureRecordView> {
        self.tracker.read().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use vigil_core::{EndpointSpec, ProbeOutcome};

    /// Prober returning a scripted outcome per URL (200 in 5ms by default)
    struct FixedProber {
        outcomes: Mutex<HashMap<String, ProbeOutcome>>,
    }

    impl FixedProber {
        fn healthy() -> Self {
            Self {
                outcomes: Mutex::new(HashMap::new()),
            }
        }

        fn with(self, url: &str, outcome: ProbeOutcome) -> Self {
            self.set(url, outcome);
            self
        }

        fn set(&self, url: &str, outcome: ProbeOutcome) {
            self.outcomes
                .lock()
                .unwrap()
                .insert(url.to_string(), outcome);
        }
    }

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self, url: &str) -> ProbeOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or(ProbeOutcome::new(5, 200))
        }
    }

    #[derive(Default)]
    struct RecordingAlertSink {
        notified: Mutex<Vec<(String, u32)>>,
    }

    impl AlertSink for RecordingAlertSink {
        fn notify(&self, url: &str, failure_count: u32) {
            self.notified
                .lock()
                .unwrap()
                .push((url.to_string(), failure_count));
        }
    }

    fn test_settings(endpoints: Vec<EndpointSpec>) -> MonitorSettings {
        MonitorSettings {
            failed_duration_secs: 3600,
            failed_url_threshold_count: 2,
            unhealthy_status_threshold_percentage: 25,
            cycle_timeout_secs: 0,
            probe_timeout_secs: 1,
            endpoints,
        }
    }

    fn four_endpoints() -> Vec<EndpointSpec> {
        (0..4)
            .map(|i| EndpointSpec::new(format!("http://host{}/health", i), 0))
            .collect()
    }

    #[tokio::test]
    async fn test_all_healthy_cycle() {
        let sink = Arc::new(RecordingAlertSink::default());
        let monitor = HealthMonitor::new(
            test_settings(four_endpoints()),
            Arc::new(FixedProber::healthy()),
            sink.clone(),
        );

        let report = monitor.run_cycle().await.unwrap();

        assert_eq!(report.verdict, HealthVerdict::Healthy);
        assert_eq!(report.unhealthy_percentage, 0);
        assert_eq!(report.endpoints.len(), 4);
        assert!(report.endpoints.iter().all(|e| !e.failed && !e.alerted));
        assert!(sink.notified.lock().unwrap().is_empty());
        assert!(monitor.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_failures_accumulate_then_alert_fires_every_cycle() {
        let endpoints = four_endpoints();
        let bad_url = endpoints[0].url.clone();
        let prober = FixedProber::healthy().with(&bad_url, ProbeOutcome::new(5, 503));
        let sink = Arc::new(RecordingAlertSink::default());
        let monitor =
            HealthMonitor::new(test_settings(endpoints), Arc::new(prober), sink.clone());

        // Counts run 1, 2, 3; the threshold of 2 is only exceeded on the
        // third cycle.
        for expected_count in 1..=2u32 {
            let report = monitor.run_cycle().await.unwrap();
            assert_eq!(report.endpoints[0].failure_count, expected_count);
            assert!(!report.endpoints[0].alerted);
        }
        assert!(sink.notified.lock().unwrap().is_empty());

        let report = monitor.run_cycle().await.unwrap();
        assert!(report.endpoints[0].alerted);
        assert_eq!(report.endpoints[0].failure_count, 3);

        // 1 of 4 over threshold -> 25%, equal to the tolerance -> healthy.
        assert_eq!(report.unhealthy_percentage, 25);
        assert_eq!(report.verdict, HealthVerdict::Healthy);

        // No dedup: the next cycle alerts again.
        monitor.run_cycle().await.unwrap();
        assert_eq!(sink.notified.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_verdict_is_unhealthy_only_above_tolerance() {
        let endpoints = four_endpoints();
        let bad_url = endpoints[0].url.clone();
        let prober = FixedProber::healthy().with(&bad_url, ProbeOutcome::new(5, 500));

        let mut settings = test_settings(endpoints);
        settings.unhealthy_status_threshold_percentage = 24;

        let monitor = HealthMonitor::new(
            settings,
            Arc::new(prober),
            Arc::new(RecordingAlertSink::default()),
        );

        monitor.run_cycle().await.unwrap();
        monitor.run_cycle().await.unwrap();
        let report = monitor.run_cycle().await.unwrap();

        // 25% strictly exceeds a tolerance of 24.
        assert_eq!(report.unhealthy_percentage, 25);
        assert_eq!(report.verdict, HealthVerdict::Unhealthy);
    }

    #[tokio::test]
    async fn test_latency_breach_with_ok_status_is_a_failure() {
        let endpoint = EndpointSpec::new("http://slow.example/health", 50);
        let prober =
            FixedProber::healthy().with(&endpoint.url, ProbeOutcome::new(120, 200));
        let monitor = HealthMonitor::new(
            test_settings(vec![endpoint]),
            Arc::new(prober),
            Arc::new(RecordingAlertSink::default()),
        );

        let report = monitor.run_cycle().await.unwrap();

        assert!(report.endpoints[0].failed);
        assert_eq!(report.endpoints[0].failure_count, 1);
    }

    #[tokio::test]
    async fn test_success_leaves_existing_record_untouched() {
        let endpoints = four_endpoints();
        let url = endpoints[0].url.clone();
        let prober = Arc::new(FixedProber::healthy().with(&url, ProbeOutcome::new(5, 503)));
        let sink = Arc::new(RecordingAlertSink::default());
        let monitor = HealthMonitor::new(test_settings(endpoints), prober.clone(), sink);

        monitor.run_cycle().await.unwrap();
        monitor.run_cycle().await.unwrap();
        assert_eq!(monitor.snapshot().await[0].count, 2);

        // The endpoint recovers; successes carry no decay, so the record
        // keeps its count.
        prober.set(&url, ProbeOutcome::new(5, 200));
        let report = monitor.run_cycle().await.unwrap();

        assert!(!report.endpoints[0].failed);
        assert_eq!(report.endpoints[0].failure_count, 2);
        let snapshot = monitor.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].count, 2);
    }

    #[tokio::test]
    async fn test_zero_endpoints_cycle_is_config_error() {
        let monitor = HealthMonitor::new(
            test_settings(Vec::new()),
            Arc::new(FixedProber::healthy()),
            Arc::new(RecordingAlertSink::default()),
        );

        let err = monitor.run_cycle().await.unwrap_err();
        assert!(matches!(err, VigilError::Config(_)));
    }
}

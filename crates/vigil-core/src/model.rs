//! Endpoint, probe outcome, and verdict type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One externally probed URL with its latency threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// URL to probe
    pub url: String,
    /// Response time threshold in milliseconds (0 disables the latency check)
    pub response_timeout_threshold_ms: u64,
}

impl EndpointSpec {
    /// Create a new endpoint spec
    pub fn new(url: impl Into<String>, response_timeout_threshold_ms: u64) -> Self {
        Self {
            url: url.into(),
            response_timeout_threshold_ms,
        }
    }
}

/// Result of a single probe against one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Wall-clock time spent on the request in milliseconds
    pub elapsed_ms: u64,
    /// HTTP status code of the response
    pub status_code: u16,
}

impl ProbeOutcome {
    /// Create a probe outcome from a received response
    pub fn new(elapsed_ms: u64, status_code: u16) -> Self {
        Self {
            elapsed_ms,
            status_code,
        }
    }

    /// Outcome for a request that never produced a response.
    ///
    /// Transport-level failures (connection refused, DNS, timeout) fold into
    /// a service-unavailable status so the pipeline counts them like any
    /// other failed probe.
    pub fn transport_failure(elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            status_code: 503,
        }
    }

    /// Classify this outcome against a latency threshold in milliseconds.
    ///
    /// A probe fails on a latency breach (when `threshold_ms` is nonzero) or
    /// on any non-200 status; a latency breach overrides status success.
    pub fn is_failure(&self, threshold_ms: u64) -> bool {
        (threshold_ms != 0 && self.elapsed_ms > threshold_ms) || self.status_code != 200
    }
}

/// Aggregate verdict for the monitored fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthVerdict {
    /// The unhealthy percentage is within tolerance
    Healthy,
    /// The unhealthy percentage exceeds tolerance
    Unhealthy,
}

impl std::fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthVerdict::Healthy => write!(f, "healthy"),
            HealthVerdict::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Per-endpoint result within one cycle report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointReport {
    /// Probed URL
    pub url: String,
    /// Wall-clock time of the probe in milliseconds
    pub elapsed_ms: u64,
    /// HTTP status code (503 for transport failures)
    pub status_code: u16,
    /// Whether the probe classified as a failure
    pub failed: bool,
    /// Windowed failure count after this probe
    pub failure_count: u32,
    /// Whether an alert fired for this endpoint in this cycle
    pub alerted: bool,
}

/// Outcome of one full probing cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Aggregate verdict for the fleet
    pub verdict: HealthVerdict,
    /// Percentage of endpoints over their failure threshold
    pub unhealthy_percentage: u32,
    /// Per-endpoint results in configuration order
    pub endpoints: Vec<EndpointReport>,
}

/// Read-only view of one tracked failure record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecordView {
    /// Endpoint URL the record belongs to
    pub url: String,
    /// Failures accumulated within the current window
    pub count: u32,
    /// Time of the most recent failure
    pub last_failure_at: DateTime<Utc>,
}

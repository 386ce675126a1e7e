//! Windowed failure bookkeeping per endpoint

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::warn;
use vigil_core::FailureRecordView;

/// Failure history for one endpoint URL
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Failures accumulated within the current window
    pub count: u32,
    /// Time of the most recent failure
    pub last_failure_at: DateTime<Utc>,
}

/// Tracks failure history for all monitored endpoints, keyed by URL.
///
/// Records are created lazily on first failure and never deleted; an
/// expired window only resets the count. Two endpoint specs with the same
/// URL collapse to one record.
#[derive(Debug, Default)]
pub struct FailureTracker {
    records: HashMap<String, FailureRecord>,
}

impl FailureTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Record one observed failure for `url` at `now`.
    ///
    /// A failure within `window_secs` of the previous one increments the
    /// count. A failure after the window expired resets the count to zero,
    /// not one: a lone failure after a quiet period only starts counting
    /// once a second failure lands inside the window. The record's
    /// timestamp advances to `now` in both cases. Returns the new count.
    pub fn record_failure(&mut self, url: &str, now: DateTime<Utc>, window_secs: u64) -> u32 {
        match self.records.get_mut(url) {
            None => {
                self.records.insert(
                    url.to_string(),
                    FailureRecord {
                        count: 1,
                        last_failure_at: now,
                    },
                );
                1
            }
            Some(record) => {
                let gap_secs = (now - record.last_failure_at).num_seconds().unsigned_abs();
                if gap_secs <= window_secs {
                    record.count += 1;
                    warn!(
                        url = %url,
                        count = record.count,
                        gap_secs,
                        "Url failed again within the failure window"
                    );
                } else {
                    record.count = 0;
                }
                record.last_failure_at = now;
                record.count
            }
        }
    }

    /// Whether `url` has strictly more windowed failures than
    /// `threshold_count`. An endpoint failing exactly `threshold_count`
    /// times is still within tolerance.
    pub fn is_over_threshold(&self, url: &str, threshold_count: u32) -> bool {
        self.records
            .get(url)
            .map(|r| r.count > threshold_count)
            .unwrap_or(false)
    }

    /// Windowed failure count for `url` (zero when never failed)
    pub fn failure_count(&self, url: &str) -> u32 {
        self.records.get(url).map(|r| r.count).unwrap_or(0)
    }

    /// Read-only view of every record, sorted by URL
    pub fn snapshot(&self) -> Vec<FailureRecordView> {
        let mut views: Vec<FailureRecordView> = self
            .records
            .iter()
            .map(|(url, record)| FailureRecordView {
                url: url.clone(),
                count: record.count,
                last_failure_at: record.last_failure_at,
            })
            .collect();
        views.sort_by(|a, b| a.url.cmp(&b.url));
        views
    }

    /// Number of URLs with a failure record
    pub fn tracked_urls(&self) -> usize {
        self.records.len()
    }
}

//! Fleet-wide unhealthy percentage

use vigil_core::{VigilError, VigilResult};

use crate::tracker::FailureTracker;

/// Percentage of `urls` currently over `threshold_count` failures, 0..=100.
///
/// Integer arithmetic throughout: `over * 100 / total` truncates toward
/// zero before the caller compares it against the fleet tolerance. An empty
/// URL list is a configuration error, never a silent 0%.
pub fn unhealthy_percentage(
    tracker: &FailureTracker,
    urls: &[String],
    threshold_count: u32,
) -> VigilResult<u32> {
    if urls.is_empty() {
        return Err(VigilError::Config(
            "cannot compute an aggregate verdict over zero configured endpoints".to_string(),
        ));
    }

    let over = urls
        .iter()
        .filter(|url| tracker.is_over_threshold(url, threshold_count))
        .count() as u32;

    Ok(over * 100 / urls.len() as u32)
}

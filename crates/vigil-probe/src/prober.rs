//! HTTP probing of downstream endpoints

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use vigil_core::ProbeOutcome;

/// Performs one probe against one URL
#[async_trait]
pub trait Prober: Send + Sync {
    /// Issue a single GET and report elapsed time and status
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP prober backed by a shared client
pub struct HttpProber {
    /// HTTP client for probe requests
    client: reqwest::Client,
    /// Timeout duration
    timeout: Duration,
}

impl HttpProber {
    /// Create a new prober whose requests time out after `timeout_secs`
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Get the timeout duration
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for HttpProber {
    /// One GET, no retry. A transport-level failure still produces an
    /// outcome: the time spent before the failure plus a
    /// service-unavailable status.
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        match self.client.get(url).send().await {
            Ok(response) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let outcome = ProbeOutcome::new(elapsed_ms, response.status().as_u16());
                info!(
                    url = %url,
                    elapsed_ms,
                    status = outcome.status_code,
                    "Response returned"
                );
                outcome
            }
            Err(e) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                warn!(
                    url = %url,
                    elapsed_ms,
                    error = %e,
                    "Probe failed before a response was received"
                );
                ProbeOutcome::transport_failure(elapsed_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prober_creation() {
        let prober = HttpProber::new(10);
        assert_eq!(prober.timeout(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_refused_connection_folds_into_service_unavailable() {
        // Port 9 (discard) is not listening.
        let prober = HttpProber::new(1);
        let outcome = prober.probe("http://127.0.0.1:9/health").await;
        assert_eq!(outcome.status_code, 503);
        assert!(outcome.is_failure(0));
    }
}

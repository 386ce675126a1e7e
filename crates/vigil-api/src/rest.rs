//! REST API handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;
use vigil_core::{EndpointSpec, FailureRecordView, HealthVerdict};
use vigil_probe::HealthMonitor;

/// Application state shared across handlers
pub struct AppState {
    pub monitor: Arc<HealthMonitor>,
}

/// Create the API router
pub fn create_router(monitor: Arc<HealthMonitor>) -> Router {
    let state = Arc::new(AppState { monitor });

    Router::new()
        .route("/ping", get(get_standard_health_check))
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/endpoints", get(get_endpoints))
        .route("/api/v1/failures", get(get_failures))
        .route("/selftest/ok", get(selftest_ok))
        .route("/selftest/fail", get(selftest_fail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Probe every configured endpoint and answer with the aggregate verdict.
///
/// A configuration error answers 500, never a false healthy.
async fn get_standard_health_check(State(state): State<Arc<AppState>>) -> (StatusCode, String) {
    match state.monitor.run_cycle().await {
        Ok(report) => match report.verdict {
            HealthVerdict::Healthy => {
                (StatusCode::OK, StatusCode::OK.as_u16().to_string())
            }
            HealthVerdict::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, String::new()),
        },
        Err(e) => {
            error!(error = %e, "Health check cycle aborted");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// System status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub endpoints: usize,
    pub tracked_urls: usize,
}

/// Get daemon status without probing
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let tracked_urls = state.monitor.snapshot().await.len();

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: state.monitor.settings().endpoints.len(),
        tracked_urls,
    })
}

/// Get the configured endpoint list
async fn get_endpoints(State(state): State<Arc<AppState>>) -> Json<Vec<EndpointSpec>> {
    Json(state.monitor.settings().endpoints.clone())
}

/// Get the tracked failure records
async fn get_failures(State(state): State<Arc<AppState>>) -> Json<Vec<FailureRecordView>> {
    Json(state.monitor.snapshot().await)
}

/// Local probe target that always answers OK
async fn selftest_ok() -> (StatusCode, String) {
    (StatusCode::OK, StatusCode::OK.as_u16().to_string())
}

/// Local probe target that always answers not-found
async fn selftest_fail() -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        StatusCode::NOT_FOUND.as_u16().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{EndpointSpec, MonitorSettings};
    use vigil_probe::{HttpProber, LogAlertSink};

    fn test_monitor() -> Arc<HealthMonitor> {
        let settings = MonitorSettings {
            failed_duration_secs: 30,
            failed_url_threshold_count: 2,
            unhealthy_status_threshold_percentage: 50,
            cycle_timeout_secs: 0,
            probe_timeout_secs: 1,
            endpoints: vec![EndpointSpec::new("http://127.0.0.1:9/health", 0)],
        };
        Arc::new(HealthMonitor::new(
            settings,
            Arc::new(HttpProber::new(1)),
            Arc::new(LogAlertSink),
        ))
    }

    #[tokio::test]
    async fn test_create_router() {
        let _router = create_router(test_monitor());
    }

    #[tokio::test]
    async fn test_selftest_targets() {
        let (ok_status, ok_body) = selftest_ok().await;
        assert_eq!(ok_status, StatusCode::OK);
        assert_eq!(ok_body, "200");

        let (fail_status, fail_body) = selftest_fail().await;
        assert_eq!(fail_status, StatusCode::NOT_FOUND);
        assert_eq!(fail_body, "404");
    }
}

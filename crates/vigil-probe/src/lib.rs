//! vigil-probe: Probing and failure tracking
//!
//! This crate provides the liveness engine:
//! - HTTP probing of downstream endpoints
//! - Windowed failure tracking per endpoint
//! - Alert decisions and the notification port
//! - Aggregate fleet verdicts

pub mod aggregate;
pub mod alert;
pub mod monitor;
pub mod prober;
pub mod tracker;

pub use alert::{AlertSink, LogAlertSink};
pub use monitor::HealthMonitor;
pub use prober::{HttpProber, Prober};
pub use tracker::FailureTracker;

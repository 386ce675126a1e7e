//! vigil daemon
//!
//! Main daemon process that probes downstream endpoints and serves the
//! aggregate liveness verdict.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vigil_api::create_router;
use vigil_core::DaemonConfig;
use vigil_probe::{HealthMonitor, HttpProber, LogAlertSink};

/// vigild - liveness-aggregation probe daemon
#[derive(Parser, Debug)]
#[command(name = "vigild")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the daemon configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the API server (overrides the config file)
    #[arg(long)]
    address: Option<String>,

    /// Port for the API server (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting vigil daemon v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &args.config {
        Some(path) => DaemonConfig::from_file(path).expect("Failed to load configuration"),
        None => DaemonConfig::default(),
    };

    // Resolve thresholds up front; a broken configuration must not serve
    // misleading verdicts.
    let settings = config
        .monitor
        .resolve()
        .expect("Invalid monitor configuration");

    info!(
        endpoints = settings.endpoints.len(),
        window_secs = settings.failed_duration_secs,
        threshold = settings.failed_url_threshold_count,
        "Monitor configured"
    );

    let prober = Arc::new(HttpProber::new(settings.probe_timeout_secs));
    let monitor = Arc::new(HealthMonitor::new(settings, prober, Arc::new(LogAlertSink)));

    // Create API router
    let router = create_router(monitor);

    // Bind and serve
    let address = args.address.unwrap_or_else(|| config.api.address.clone());
    let port = args.port.unwrap_or(config.api.port);
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .expect("Invalid address");

    info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, router).await.expect("Server error");
}

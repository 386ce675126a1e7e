//! vigil CLI
//!
//! Command-line interface for interacting with the vigil daemon.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// vigil - liveness-aggregation probe monitor
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Daemon API address
    #[arg(long, default_value = "http://localhost:9090", global = true)]
    api: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one probing cycle and print the aggregate verdict
    Check,

    /// Show daemon status
    Status,

    /// Show the configured endpoints
    Endpoints,

    /// Show the tracked failure records
    Failures,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = commands::ApiClient::new(&cli.api);

    match cli.command {
        Commands::Check => {
            commands::check(&client).await?;
        }
        Commands::Status => {
            commands::status(&client).await?;
        }
        Commands::Endpoints => {
            commands::endpoints(&client).await?;
        }
        Commands::Failures => {
            commands::failures(&client).await?;
        }
    }

    Ok(())
}

//! Stop-loss sentinel - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use sentinel_bot::{AppConfig, Application, RunOptions};

/// Watches leveraged positions and pushes alerts when stop-losses are
/// missing, set, removed or moved.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SL_SENTINEL_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Log alerts instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging so its log_level can apply
    let config_path = AppConfig::resolve_path(args.config);
    let (config, found) = AppConfig::load(&config_path)?;

    sentinel_telemetry::init_logging_with(config.telemetry.log_level.as_deref())?;

    info!("Starting sl-sentinel v{}", env!("CARGO_PKG_VERSION"));
    if found {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let app = Application::new(
        config,
        RunOptions {
            dry_run: args.dry_run,
        },
    )?;

    if args.once {
        let report = app.run_once().await?;
        info!(
            outcome = report.outcome.as_str(),
            alerts = report.alerts.len(),
            delivery_failures = report.delivery_failures,
            "Single cycle complete"
        );
        return Ok(());
    }

    app.run().await?;

    Ok(())
}

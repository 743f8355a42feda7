//! PositionNotifier - Main Entry Point
//!
//! Polls a Capital.com account for open positions and sends a Telegram
//! message whenever a position is opened or closed.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use position_notifier::config::load_config;
use position_notifier::{
    CapitalClient, MonitorSettings, PositionMonitor, TelegramNotifier,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;

    // Initialize logging; RUST_LOG wins over both flag and config
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone())
        .to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting PositionNotifier");
    info!("Configuration file: {}", args.config);

    let capital = CapitalClient::new(&config.capital, config.settings.request_timeout())?;
    let notifier = TelegramNotifier::from_config(&config.telegram, &config.settings)?;
    let monitor = PositionMonitor::new(
        capital.clone(),
        capital,
        notifier,
        MonitorSettings::from(&config.settings),
    );
    info!(
        "Polling every {}s, throttle retry cap {}, re-authentication {}",
        monitor.settings().poll_interval.as_secs(),
        config.settings.max_throttle_retries,
        if monitor.settings().reauthenticate_on_expiry { "on" } else { "off" }
    );

    tokio::select! {
        outcome = monitor.run() => match outcome {
            Ok(never) => match never {},
            Err(e) => {
                error!("Position monitor stopped: {}", e);
                Err(e.into())
            }
        },
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received shutdown signal, cleaning up...");
            Ok(())
        }
    }
}

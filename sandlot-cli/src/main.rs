//! ## sandlot-cli
//! **Command-line frontend for the dice-baseball simulator**
//! Monte Carlo batches, seed sweeps, scripted replays and the outcome table.
//!
//! ### Expectations:
//! - Configuration file, then environment, then flags
//! - Logging follows `telemetry.log_filter` unless `RUST_LOG` is set
//! - Non-zero exit on digest mismatch or unmet scenario expectation

use clap::Parser;
use sandlot_config::SandlotConfig;
use sandlot_telemetry::EventLogger;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = SandlotConfig::load_or_default(cli.config.as_deref())?;
    EventLogger::init(&config.telemetry.log_filter);

    commands::run_command(cli.command, config).await
}

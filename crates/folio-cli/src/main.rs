//! Folio CLI - Command-line interface for portfolio metrics.
//!
//! # Usage
//!
//! ```bash
//! # Metrics for a whole ledger, valued today
//! folio metrics ledger.csv
//!
//! # One folio, valued at a fixed date, as JSON
//! folio metrics ledger.json --account CAN-001 --as-of 2024-03-31 --format json
//!
//! # Per-account drill-down
//! folio metrics ledger.csv --by-account
//!
//! # XIRR of a raw date,amount series
//! folio xirr flows.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("folio_metrics=debug,folio_math=debug,folio=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Metrics(args) => commands::metrics::execute(args, &config, format)?,
        Commands::Xirr(args) => commands::xirr::execute(args, &config, format)?,
    }

    Ok(())
}

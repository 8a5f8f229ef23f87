//! Virtual-football odds export CLI
//!
//! Connects to the VFL feed, runs the full fixture + odds pass and persists
//! the flattened result.
//!
//! # Usage
//! ```bash
//! # Default run: CSV export of the current matchday to football.csv
//! vfl_odds
//!
//! # JSON export with quieter progress output
//! vfl_odds --format json --out odds.json --trace-level error
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use betradar_adapter::{Export, OddsClient, TraceLevel};

#[derive(Parser)]
#[command(name = "vfl_odds")]
#[command(about = "Export virtual-football fixtures and featured-market odds")]
#[command(version)]
struct Cli {
    /// Output format: csv or json
    #[arg(long, default_value = "csv")]
    format: String,

    /// Output file path
    #[arg(long, default_value = "football.csv")]
    out: PathBuf,

    /// Feed progress verbosity (info, success, warning, error)
    #[arg(long, default_value = "info")]
    trace_level: String,

    /// Log level for diagnostics (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    let trace_level = match TraceLevel::from_str(&cli.trace_level) {
        Some(level) => level,
        None => {
            anyhow::bail!(
                "Unknown trace level: {}. Supported: info, success, warning, error",
                cli.trace_level
            );
        }
    };

    let client = OddsClient::connect(trace_level).await?;
    let export = client.get_full(&cli.format).await?;

    let (text, fixtures) = match &export {
        Export::Table(table) => (table.to_csv(), table.rows.len()),
        Export::Records(records) => (serde_json::to_string_pretty(records)?, records.len()),
    };

    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&cli.out, text).await?;

    info!("Exported {} fixture(s) to {}", fixtures, cli.out.display());

    Ok(())
}

//! RegionPulse Control - CLI client for RegionPulse
//!
//! Aggregates telemetry locally or talks to the pulsed daemon.

use anyhow::Result;
use clap::Parser;
use pulsectl::cli::{Cli, Commands};
use pulsectl::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate { data, regions, threshold, json } => {
            commands::run_aggregate(data, regions, threshold, json)
        }
        Commands::Query { url, regions, threshold, json } => {
            commands::run_query(&url, regions, threshold, json).await
        }
        Commands::Health { url, json } => commands::run_health(&url, json).await,
    }
}

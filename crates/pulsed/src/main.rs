//! RegionPulse Daemon - regional latency/uptime aggregation service
//!
//! Serves `POST /api/deployments` over a static telemetry dataset.

use anyhow::Result;
use clap::Parser;
use pulsed::config::Config;
use pulsed::server::{self, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulsed")]
#[command(about = "RegionPulse - regional latency aggregation daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (defaults to /etc/regionpulse/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file and $PULSED_BIND
    #[arg(long)]
    bind: Option<String>,

    /// Telemetry dataset path; repeat to give several candidates in priority order
    #[arg(long = "data")]
    data: Vec<PathBuf>,

    /// Write a default config file to the given path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.init_config {
        return Config::save_default(path);
    }

    // The real subscriber depends on the config, so config loading logs
    // through a temporary one
    let bootstrap = tracing_subscriber::fmt().with_env_filter(EnvFilter::new("info")).finish();
    let mut config = tracing::subscriber::with_default(bootstrap, || {
        let config = match &args.config {
            Some(path) => Config::load_from_path(path)?,
            None => Config::load(),
        };
        anyhow::Ok(config.with_env_overrides())
    })?;

    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if !args.data.is_empty() {
        config.data.candidates = args.data;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("RegionPulse daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(config)?;
    server::run(state).await
}

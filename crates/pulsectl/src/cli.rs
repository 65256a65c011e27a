//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default daemon address
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000";

/// RegionPulse CLI
#[derive(Parser)]
#[command(name = "pulsectl")]
#[command(about = "RegionPulse - regional latency/uptime reports", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a local telemetry dataset without a daemon
    Aggregate {
        /// Dataset path; repeat for fallbacks (defaults to the standard locations)
        #[arg(long)]
        data: Vec<PathBuf>,

        /// Region to report on; repeat for several (defaults to every region in the dataset)
        #[arg(long = "region", short = 'r')]
        regions: Vec<String>,

        /// Latency threshold in milliseconds
        #[arg(long, short = 't')]
        threshold: Option<f64>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Ask a running daemon for region metrics
    Query {
        /// Daemon base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,

        /// Region to report on; repeat for several
        #[arg(long = "region", short = 'r', required = true)]
        regions: Vec<String>,

        /// Latency threshold in milliseconds
        #[arg(long, short = 't')]
        threshold: Option<f64>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show daemon health
    Health {
        /// Daemon base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregate() {
        let cli = Cli::try_parse_from([
            "pulsectl", "aggregate", "--data", "a.json", "--data", "b.json", "-r", "emea", "-r",
            "apac", "-t", "150",
        ])
        .unwrap();
        match cli.command {
            Commands::Aggregate { data, regions, threshold, json } => {
                assert_eq!(data, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(regions, vec!["emea".to_string(), "apac".to_string()]);
                assert_eq!(threshold, Some(150.0));
                assert!(!json);
            }
            _ => panic!("expected aggregate"),
        }
    }

    #[test]
    fn test_query_requires_region() {
        assert!(Cli::try_parse_from(["pulsectl", "query"]).is_err());
    }

    #[test]
    fn test_query_default_url() {
        let cli = Cli::try_parse_from(["pulsectl", "query", "-r", "emea", "--json"]).unwrap();
        match cli.command {
            Commands::Query { url, json, threshold, .. } => {
                assert_eq!(url, DEFAULT_URL);
                assert!(json);
                assert_eq!(threshold, None);
            }
            _ => panic!("expected query"),
        }
    }
}

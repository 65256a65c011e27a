//! RegionPulse Common - Shared types, telemetry loading and region aggregation
//!
//! The daemon and the CLI both build on this crate. Nothing here does network
//! I/O; the loader only reads local files.

pub mod aggregator;
pub mod error;
pub mod loader;
pub mod types;

pub use aggregator::{aggregate, known_regions, percentile, round2, summarize};
pub use error::PulseError;
pub use loader::{FileTelemetrySource, StaticTelemetrySource, TelemetrySource, DEFAULT_CANDIDATES};
pub use types::*;

//! Error types for RegionPulse.
//!
//! The `Display` text of each variant is what callers see in the `error`
//! field of a failure envelope.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    /// Request is well-formed JSON but `regions` is missing or empty
    #[error("{0}")]
    Validation(String),

    /// Request body could not be read as an aggregation request
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("No telemetry data available")]
    DataUnavailable,

    #[error("malformed telemetry data in {}: {message}", .path.display())]
    MalformedInput { path: PathBuf, message: String },

    #[error("failed to read telemetry data from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request body exceeded the configured size limit
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Request did not finish within the configured timeout
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PulseError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PulseError::Validation(_) => "validation",
            PulseError::InvalidRequest(_) => "invalid_request",
            PulseError::DataUnavailable => "data_unavailable",
            PulseError::MalformedInput { .. } => "malformed_input",
            PulseError::Io { .. } => "io",
            PulseError::PayloadTooLarge { .. } => "payload_too_large",
            PulseError::Timeout { .. } => "timeout",
            PulseError::Internal(_) => "internal",
        }
    }

    /// True for failures caused by the caller's request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PulseError::Validation(_)
                | PulseError::InvalidRequest(_)
                | PulseError::PayloadTooLarge { .. }
        )
    }
}

//! Data model shared by the daemon and the CLI.

use crate::error::PulseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Threshold applied when a request omits `threshold_ms`
pub const DEFAULT_THRESHOLD_MS: f64 = 180.0;

/// One latency/uptime observation for a region.
///
/// Absent or `null` fields read as their defaults (`""` and `0`), so a sparse
/// record still takes part in aggregation. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub latency_ms: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uptime_pct: f64,
}

impl TelemetryRecord {
    pub fn new(region: impl Into<String>, latency_ms: f64, uptime_pct: f64) -> Self {
        Self {
            region: region.into(),
            latency_ms,
            uptime_pct,
        }
    }

    /// Case-insensitive region comparison
    pub fn matches_region(&self, region: &str) -> bool {
        self.region.to_lowercase() == region.to_lowercase()
    }
}

/// Summary statistics for one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub avg_latency: f64,
    pub p95_latency: f64,
    pub avg_uptime: f64,
    pub breaches: u64,
}

impl RegionStats {
    /// Stats reported for a region with no matching records
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn has_breaches(&self) -> bool {
        self.breaches > 0
    }
}

/// Region name (as requested) to its statistics
pub type RegionMetrics = BTreeMap<String, RegionStats>;

/// Body of `POST /api/deployments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Regions to report on. Missing and empty are both rejected by `validate`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub regions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_ms: Option<f64>,
}

impl AggregationRequest {
    pub fn new(regions: Vec<String>, threshold_ms: Option<f64>) -> Self {
        Self {
            regions,
            threshold_ms,
        }
    }

    /// Parse a raw request body.
    ///
    /// Shape errors (not an object, wrong field types) become
    /// `PulseError::InvalidRequest`; a missing `regions` key is left for
    /// `validate` so it reports as a validation failure.
    pub fn from_slice(body: &[u8]) -> Result<Self, PulseError> {
        serde_json::from_slice(body).map_err(|e| PulseError::InvalidRequest(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PulseError> {
        if self.regions.is_empty() {
            return Err(PulseError::Validation(
                "regions parameter is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective threshold in milliseconds
    pub fn threshold(&self) -> f64 {
        self.threshold_ms.unwrap_or(DEFAULT_THRESHOLD_MS)
    }
}

/// Uniform response envelope.
///
/// Exactly one of `metrics` and `error` is present; the other key is omitted
/// from the JSON rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentsResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RegionMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeploymentsResponse {
    pub fn ok(metrics: RegionMetrics) -> Self {
        Self {
            success: true,
            metrics: Some(metrics),
            error: None,
        }
    }

    pub fn failure(error: &PulseError) -> Self {
        Self {
            success: false,
            metrics: None,
            error: Some(error.to_string()),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

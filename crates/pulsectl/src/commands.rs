//! Command implementations for pulsectl.

use crate::client::PulsedClient;
use crate::display;
use anyhow::{bail, Result};
use pulse_common::{
    aggregate, known_regions, AggregationRequest, FileTelemetrySource, PulseError, RegionMetrics,
    TelemetrySource,
};
use std::path::PathBuf;

/// Load and aggregate a local dataset.
///
/// Applies the same rules as the daemon: no data is an error, and an empty
/// region list means every region found in the dataset.
pub fn aggregate_local(
    data: Vec<PathBuf>,
    regions: Vec<String>,
    threshold: Option<f64>,
) -> Result<(RegionMetrics, f64), PulseError> {
    let source = if data.is_empty() {
        FileTelemetrySource::default()
    } else {
        FileTelemetrySource::new(data)
    };

    let records = source.load()?;
    if records.is_empty() {
        return Err(PulseError::DataUnavailable);
    }

    let regions = if regions.is_empty() {
        known_regions(&records)
    } else {
        regions
    };
    let request = AggregationRequest::new(regions, threshold);
    request.validate()?;

    let threshold = request.threshold();
    Ok((aggregate(&records, &request.regions, threshold), threshold))
}

pub fn run_aggregate(
    data: Vec<PathBuf>,
    regions: Vec<String>,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let (metrics, threshold) = aggregate_local(data, regions, threshold)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        display::print_metrics(&metrics, threshold);
    }
    Ok(())
}

pub async fn run_query(
    url: &str,
    regions: Vec<String>,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let client = PulsedClient::new(url)?;
    let request = AggregationRequest::new(regions, threshold);
    let response = client.deployments(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.success {
            bail!("Daemon reported failure");
        }
        return Ok(());
    }

    match (response.success, response.metrics) {
        (true, Some(metrics)) => {
            display::print_metrics(&metrics, request.threshold());
            Ok(())
        }
        _ => {
            let error = response.error.unwrap_or_else(|| "unknown error".to_string());
            display::print_failure(&error);
            bail!("Daemon reported failure")
        }
    }
}

pub async fn run_health(url: &str, json: bool) -> Result<()> {
    let client = PulsedClient::new(url)?;
    let health = client.health().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        display::print_health(&health, client.base_url());
    }
    Ok(())
}

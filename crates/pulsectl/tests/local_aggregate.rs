//! Tests for offline aggregation through pulsectl.

use pulse_common::{PulseError, RegionStats};
use pulsectl::commands::aggregate_local;
use pulsectl::display::format_metrics_table;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DATASET: &str = r#"[
    {"region": "us-east", "service": "api", "latency_ms": 100, "uptime_pct": 99.0},
    {"region": "US-East", "service": "cdn", "latency_ms": 200, "uptime_pct": 98.0},
    {"region": "us-east", "service": "auth", "latency_ms": 300, "uptime_pct": 97.0},
    {"region": "emea", "service": "api", "latency_ms": 140.5, "uptime_pct": 99.25},
    {"service": "orphan", "latency_ms": 999}
]"#;

fn dataset(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("telemetry.json");
    fs::write(&path, DATASET).unwrap();
    path
}

#[test]
fn test_requested_regions() {
    let dir = TempDir::new().unwrap();
    let (metrics, threshold) = aggregate_local(
        vec![dataset(&dir)],
        vec!["us-east".to_string(), "apac".to_string()],
        Some(150.0),
    )
    .unwrap();

    assert_eq!(threshold, 150.0);
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics["us-east"].avg_latency, 200.0);
    assert_eq!(metrics["us-east"].breaches, 2);
    assert_eq!(metrics["apac"], RegionStats::zeroed());
}

#[test]
fn test_all_regions_when_none_requested() {
    let dir = TempDir::new().unwrap();
    let (metrics, threshold) = aggregate_local(vec![dataset(&dir)], Vec::new(), None).unwrap();

    assert_eq!(threshold, 180.0);
    // The record without a region shows up under the empty name
    let keys: Vec<&str> = metrics.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["", "emea", "us-east"]);
    assert_eq!(metrics[""].breaches, 1);
    assert_eq!(metrics["emea"].avg_uptime, 99.25);
}

#[test]
fn test_fallback_candidate_used() {
    let dir = TempDir::new().unwrap();
    let (metrics, _) = aggregate_local(
        vec![dir.path().join("absent.json"), dataset(&dir)],
        vec!["emea".to_string()],
        None,
    )
    .unwrap();
    assert_eq!(metrics["emea"].avg_latency, 140.5);
}

#[test]
fn test_missing_dataset_is_data_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = aggregate_local(vec![dir.path().join("absent.json")], Vec::new(), None).unwrap_err();
    assert!(matches!(err, PulseError::DataUnavailable));
}

#[test]
fn test_malformed_dataset_propagates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"[{"region": "emea", "latency_ms": "slow"}]"#).unwrap();
    let err = aggregate_local(vec![path], vec!["emea".to_string()], None).unwrap_err();
    assert!(matches!(err, PulseError::MalformedInput { .. }));
}

#[test]
fn test_table_rendering() {
    let dir = TempDir::new().unwrap();
    let (metrics, threshold) =
        aggregate_local(vec![dataset(&dir)], vec!["us-east".to_string()], Some(150.0)).unwrap();
    let table = format_metrics_table(&metrics, threshold);
    assert!(table.contains("us-east"));
    assert!(table.contains("200.00"));
    assert!(table.contains("1 of 1 regions over 150ms"));
}

//! Region aggregator.
//!
//! Reduces a telemetry record set to per-region statistics: mean latency,
//! p95 latency, mean uptime and the number of records over a latency
//! threshold. Every function here is pure and total.

use crate::types::{RegionMetrics, RegionStats, TelemetryRecord};
use std::collections::BTreeSet;

/// Percentile reported as `p95_latency`
pub const P95: f64 = 95.0;

/// Aggregate `records` for each requested region.
///
/// The result holds one entry per distinct requested region, keyed by the
/// region string exactly as requested. Regions without matching records get
/// `RegionStats::zeroed()`.
pub fn aggregate(records: &[TelemetryRecord], regions: &[String], threshold_ms: f64) -> RegionMetrics {
    let mut metrics = RegionMetrics::new();

    for region in regions {
        let wanted = region.to_lowercase();
        let matched: Vec<&TelemetryRecord> = records
            .iter()
            .filter(|record| record.region.to_lowercase() == wanted)
            .collect();

        metrics.insert(region.clone(), summarize(&matched, threshold_ms));
    }

    metrics
}

/// Statistics for an already-filtered set of records
pub fn summarize(records: &[&TelemetryRecord], threshold_ms: f64) -> RegionStats {
    if records.is_empty() {
        return RegionStats::zeroed();
    }

    let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
    let uptimes: Vec<f64> = records.iter().map(|r| r.uptime_pct).collect();
    let breaches = latencies.iter().filter(|&&latency| latency > threshold_ms).count() as u64;

    RegionStats {
        avg_latency: round2(mean(&latencies)),
        p95_latency: round2(percentile(&latencies, P95)),
        avg_uptime: round2(mean(&uptimes)),
        breaches,
    }
}

/// Percentile by linear interpolation between closest ranks.
///
/// `pct` is in `[0, 100]`; values outside are clamped. Returns 0 for an empty
/// slice. The input does not need to be sorted.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    let (low, high) = (sorted[lo], sorted[hi]);
    let span = high - low;
    if span.is_finite() {
        low + span * weight
    } else {
        // Opposite extremes: the span overflows but each term does not
        low * (1.0 - weight) + high * weight
    }
}

/// Round to 2 decimal places, halves away from zero.
///
/// Values too large to scale by 100 have no fractional part left and are
/// returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Distinct regions present in a dataset, lowercased and sorted
pub fn known_regions(records: &[TelemetryRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.region.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Running mean. Each step scales before adding, so finite input never
/// overflows the way a plain sum does near `f64::MAX`.
fn mean(values: &[f64]) -> f64 {
    values.iter().enumerate().fold(0.0, |acc, (i, &value)| {
        let n = (i + 1) as f64;
        acc - acc / n + value / n
    })
}

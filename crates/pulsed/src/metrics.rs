//! Prometheus metrics for the aggregation service

use prometheus::{
    register_counter_vec_with_registry, register_histogram_with_registry,
    register_int_counter_with_registry, CounterVec, Encoder, Histogram, IntCounter, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Service metrics for Prometheus
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Aggregation requests by outcome ("success" or an error kind)
    pub requests_total: CounterVec,
    pub regions_requested_total: IntCounter,
    /// Time spent loading and aggregating, per successful request
    pub aggregation_seconds: Histogram,

    registry: Arc<Registry>,
}

impl ServiceMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = register_counter_vec_with_registry!(
            "regionpulse_requests_total",
            "Total number of aggregation requests by outcome",
            &["outcome"],
            registry
        )?;

        let regions_requested_total = register_int_counter_with_registry!(
            "regionpulse_regions_requested_total",
            "Total number of regions requested across all aggregation requests",
            registry
        )?;

        let aggregation_seconds = register_histogram_with_registry!(
            "regionpulse_aggregation_seconds",
            "Time to load telemetry and aggregate it, in seconds",
            vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
            registry
        )?;

        Ok(Self {
            requests_total,
            regions_requested_total,
            aggregation_seconds,
            registry: Arc::new(registry),
        })
    }

    /// Record one aggregation request
    pub fn record_request(&self, outcome: &str) {
        self.requests_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_regions(&self, count: usize) {
        self.regions_requested_total.inc_by(count as u64);
    }

    pub fn observe_aggregation(&self, duration_secs: f64) {
        self.aggregation_seconds.observe(duration_secs);
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

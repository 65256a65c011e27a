//! Display helpers for pulsectl output.

use crate::client::DaemonHealth;
use owo_colors::OwoColorize;
use pulse_common::{RegionMetrics, RegionStats};

const REGION_WIDTH: usize = 16;

/// Render metrics as an aligned table. Regions with breaches are highlighted.
pub fn format_metrics_table(metrics: &RegionMetrics, threshold_ms: f64) -> String {
    let width = metrics
        .keys()
        .map(|region| region.len())
        .max()
        .unwrap_or(0)
        .max(REGION_WIDTH);

    let mut out = String::new();
    out.push_str(&format!(
        "{:width$} {:>12} {:>12} {:>11} {:>9}\n",
        "region",
        "avg_latency",
        "p95_latency",
        "avg_uptime",
        "breaches",
        width = width
    ));

    for (region, stats) in metrics {
        out.push_str(&format_row(region, stats, width));
        out.push('\n');
    }

    let breaching = metrics.values().filter(|s| s.has_breaches()).count();
    out.push_str(&format!(
        "\n{} of {} regions over {}ms",
        breaching,
        metrics.len(),
        threshold_ms
    ));
    out
}

fn format_row(region: &str, stats: &RegionStats, width: usize) -> String {
    let row = format!(
        "{:width$} {:>12.2} {:>12.2} {:>11.2} {:>9}",
        region,
        stats.avg_latency,
        stats.p95_latency,
        stats.avg_uptime,
        stats.breaches,
        width = width
    );
    if stats.has_breaches() {
        row.bright_red().to_string()
    } else {
        row.green().to_string()
    }
}

pub fn print_metrics(metrics: &RegionMetrics, threshold_ms: f64) {
    println!();
    println!("{}", format_metrics_table(metrics, threshold_ms));
    println!();
}

pub fn print_failure(error: &str) {
    eprintln!("{} {}", "[FAILED]".bright_red(), error);
}

pub fn print_health(health: &DaemonHealth, url: &str) {
    let kw = 15;
    let status = if health.data_available {
        health.status.bright_green().to_string()
    } else {
        format!("{} (no data)", health.status).yellow().to_string()
    };
    println!();
    print_kv("daemon", url, kw);
    print_kv("status", &status, kw);
    print_kv("version", &health.version, kw);
    print_kv("uptime", &format!("{}s", health.uptime_seconds), kw);
    print_kv("started_at", &health.started_at, kw);
    print_kv("data_source", &health.data_source, kw);
    println!();
}

fn print_kv(key: &str, value: &str, width: usize) {
    println!("{:width$} {}", key, value, width = width);
}

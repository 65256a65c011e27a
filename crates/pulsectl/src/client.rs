//! HTTP client for communicating with pulsed.

use anyhow::{anyhow, Context, Result};
use pulse_common::{AggregationRequest, DeploymentsResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Daemon health as reported by `GET /v1/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonHealth {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(default)]
    pub started_at: String,
    pub data_source: String,
    pub data_available: bool,
}

/// Client for communicating with pulsed
pub struct PulsedClient {
    base_url: String,
    http: reqwest::Client,
}

impl PulsedClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST an aggregation request.
    ///
    /// Failure envelopes come back as `Ok` with `success: false`; only
    /// transport problems and non-envelope bodies are errors.
    pub async fn deployments(&self, request: &AggregationRequest) -> Result<DeploymentsResponse> {
        let url = format!("{}/api/deployments", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        let body = response.text().await.context("Failed to read daemon response")?;
        serde_json::from_str(&body)
            .with_context(|| format!("Unexpected response from daemon (HTTP {}): {}", status, body))
    }

    pub async fn health(&self) -> Result<DaemonHealth> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()?;

        response.json().await.context("Failed to parse health response")
    }

    fn unreachable(&self, err: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach RegionPulse daemon at {}: {}\n\n\
             Start it with `pulsed` or pass --url.",
            self.base_url,
            err
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = PulsedClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_health_parses_daemon_payload() {
        let health: DaemonHealth = serde_json::from_str(
            r#"{"status": "healthy", "version": "0.1.0", "uptime_seconds": 12,
                "started_at": "2026-01-01T00:00:00+00:00",
                "data_source": "file:q-vercel-latency.json", "data_available": true}"#,
        )
        .unwrap();
        assert_eq!(health.status, "healthy");
        assert!(health.data_available);
    }
}

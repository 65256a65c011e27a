//! API routes for pulsed

use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pulse_common::{aggregate, AggregationRequest, DeploymentsResponse, PulseError, RegionMetrics};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

/// Failure envelope with an HTTP status picked from the error kind
#[derive(Debug)]
pub struct ApiError(pub PulseError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PulseError::Validation(_) | PulseError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PulseError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PulseError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            PulseError::DataUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PulseError::MalformedInput { .. } | PulseError::Io { .. } | PulseError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(DeploymentsResponse::failure(&self.0))).into_response()
    }
}

// ============================================================================
// Deployment Routes
// ============================================================================

pub fn deployment_routes() -> Router<AppStateArc> {
    Router::new().route("/api/deployments", post(deployments))
}

/// Aggregate telemetry for the requested regions.
///
/// The body is taken as raw bytes so that every parse failure still gets the
/// JSON envelope instead of axum's plain-text rejection.
async fn deployments(
    State(state): State<AppStateArc>,
    body: Bytes,
) -> Result<Json<DeploymentsResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    match aggregate_request(&state, &body).await {
        Ok(metrics) => {
            let elapsed = start.elapsed();
            state.metrics.record_request("success");
            state.metrics.observe_aggregation(elapsed.as_secs_f64());
            info!(
                "[{}]  Aggregated {} regions in {}ms",
                request_id,
                metrics.len(),
                elapsed.as_millis()
            );
            Ok(Json(DeploymentsResponse::ok(metrics)))
        }
        Err(e) => {
            state.metrics.record_request(e.kind());
            if e.is_client_error() {
                warn!("[{}]  Rejected request: {}", request_id, e);
            } else {
                error!("[{}]  Aggregation failed: {}", request_id, e);
            }
            Err(ApiError(e))
        }
    }
}

async fn aggregate_request(state: &AppState, body: &[u8]) -> Result<RegionMetrics, PulseError> {
    let request = AggregationRequest::from_slice(body)?;
    request.validate()?;
    state.metrics.record_regions(request.regions.len());

    // File read is blocking; keep it off the async workers
    let source = Arc::clone(&state.source);
    let records = tokio::task::spawn_blocking(move || source.load())
        .await
        .map_err(|e| PulseError::Internal(e.to_string()))??;

    if records.is_empty() {
        return Err(PulseError::DataUnavailable);
    }

    Ok(aggregate(&records, &request.regions, request.threshold()))
}

// ============================================================================
// Greeting Routes
// ============================================================================

pub fn greeting_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/api/python", get(hello))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "Hello": "World" }))
}

async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub data_source: String,
    pub data_available: bool,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let source = Arc::clone(&state.source);
    let (data_source, data_available) =
        tokio::task::spawn_blocking(move || (source.describe(), source.is_available()))
            .await
            .unwrap_or_else(|e| {
                error!("  Health check failed: {}", e);
                ("unknown".to_string(), false)
            });

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        started_at: state.started_at.to_rfc3339(),
        data_source,
        data_available,
    })
}

// ============================================================================
// Metrics Routes
// ============================================================================

pub fn metrics_routes() -> Router<AppStateArc> {
    Router::new().route("/metrics", get(export_metrics))
}

async fn export_metrics(State(state): State<AppStateArc>) -> Response {
    match state.metrics.export() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("  Metrics export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (PulseError::Validation("regions parameter is required".into()), 400),
            (PulseError::InvalidRequest("eof".into()), 400),
            (PulseError::PayloadTooLarge { limit: 65536 }, 413),
            (PulseError::Timeout { secs: 10 }, 408),
            (PulseError::DataUnavailable, 503),
            (
                PulseError::MalformedInput {
                    path: PathBuf::from("data.json"),
                    message: "trailing comma".into(),
                },
                500,
            ),
            (
                PulseError::Io {
                    path: PathBuf::from("data.json"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "is a directory"),
                },
                500,
            ),
            (PulseError::Internal("panic".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status().as_u16(), status);
        }
    }
}

//! Request middleware: CORS, body limits and request timeouts

use crate::config::CorsConfig;
use crate::routes::ApiError;
use crate::server::AppState;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::map_response_with_state;
use axum::response::{IntoResponse, Response};
use axum::Router;
use pulse_common::PulseError;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the CORS layer.
///
/// "*" mirrors the request origin back so that credentials can still be
/// allowed; browsers reject a literal `*` together with credentials.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
}

/// Rewrite the plain responses of the body-limit and timeout layers into
/// failure envelopes. Responses that already carry JSON pass through.
async fn envelope_layer_failures(State(state): State<Arc<AppState>>, response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    let server = &state.config.server;
    let err = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => PulseError::PayloadTooLarge {
            limit: server.max_body_bytes,
        },
        StatusCode::REQUEST_TIMEOUT => PulseError::Timeout {
            secs: server.request_timeout_secs,
        },
        _ => return response,
    };

    state.metrics.record_request(err.kind());
    warn!("  Request rejected at boundary: {}", err);
    ApiError(err).into_response()
}

/// Wrap the router with the service-wide layers.
///
/// Outermost first: tracing, CORS, envelope rewrite, timeout, body limit.
pub fn apply(router: Router, state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let limit = RequestBodyLimitLayer::new(server.max_body_bytes);
    let timeout = TimeoutLayer::new(server.request_timeout());
    let cors = cors_layer(&state.config.cors);

    router
        .layer(DefaultBodyLimit::disable())
        .layer(limit)
        .layer(timeout)
        .layer(map_response_with_state(state, envelope_layer_failures))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

//! HTTP server for pulsed

use crate::config::Config;
use crate::metrics::ServiceMetrics;
use crate::{middleware, routes};
use anyhow::{Context, Result};
use axum::Router;
use chrono::{DateTime, Utc};
use pulse_common::TelemetrySource;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Application state shared across handlers.
///
/// Everything here is read-only after construction; handlers never lock.
pub struct AppState {
    pub source: Arc<dyn TelemetrySource>,
    pub config: Config,
    pub metrics: ServiceMetrics,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(source: Arc<dyn TelemetrySource>, config: Config) -> Result<Self> {
        let metrics = ServiceMetrics::new().context("Failed to register service metrics")?;
        Ok(Self {
            source,
            config,
            metrics,
            start_time: Instant::now(),
            started_at: Utc::now(),
        })
    }

    /// State reading the dataset from the configured candidate paths
    pub fn from_config(config: Config) -> Result<Self> {
        let source = Arc::new(config.data.source());
        Self::new(source, config)
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::deployment_routes())
        .merge(routes::greeting_routes())
        .merge(routes::health_routes())
        .merge(routes::metrics_routes())
        .with_state(Arc::clone(&state));

    middleware::apply(app, state)
}

/// Run the HTTP server until ctrl-c
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server.bind_addr.clone();
    info!("  Telemetry source: {}", state.source.describe());

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

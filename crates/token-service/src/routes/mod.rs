//! HTTP routes for the token service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::services::CredentialIssuer;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential issuer built from the signing configuration.
    pub issuer: CredentialIssuer,

    /// Service configuration.
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            issuer: CredentialIssuer::from_config(&config),
            config,
        }
    }
}

/// Build the application routes.
///
/// - `POST /api/token` - issue a session credential
/// - `GET /health` - liveness
/// - `GET /metrics` - Prometheus scrape endpoint
///
/// Layer order (bottom-to-top execution):
/// 1. TimeoutLayer - 30 second request timeout (innermost)
/// 2. TraceLayer - request logging
/// 3. CorsLayer - permissive, the browser client may be served elsewhere
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route("/api/token", post(handlers::issue_token))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    api_routes
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

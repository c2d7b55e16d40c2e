//! Liveness check.

/// Handler for GET /health
///
/// Returns plain "OK". The service has no downstream dependencies to check.
#[tracing::instrument(skip_all, name = "token.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}

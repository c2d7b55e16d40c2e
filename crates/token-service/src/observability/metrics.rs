//! Metrics definitions for the token service.
//!
//! Prometheus naming conventions:
//! - `token_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! Labels are bounded: `status` is `success` or `error`, `error_category`
//! is `validation` or `signing`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder and return a render handle.
///
/// Fails if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("token_issuance".to_string()),
            &[0.0005, 0.001, 0.0025, 0.005, 0.010, 0.025, 0.050, 0.100],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install metrics recorder: {e}"))
}

/// Record token issuance duration and outcome.
///
/// Metrics: `token_issuance_duration_seconds`, `token_issuance_total`
/// Labels: `status`, `error_category`
pub fn record_token_issuance(status: &str, error_category: Option<&str>, duration: Duration) {
    histogram!("token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!(
        "token_issuance_total",
        "status" => status.to_string(),
        "error_category" => error_category.unwrap_or("none").to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        // No recorder is installed in unit tests; recording must not panic.
        record_token_issuance("success", None, Duration::from_millis(1));
        record_token_issuance("error", Some("signing"), Duration::from_millis(1));
    }
}

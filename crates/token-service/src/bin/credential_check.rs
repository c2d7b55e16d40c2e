//! Verify SDK signing credentials before starting the token service.
//!
//! Exits non-zero when the key or secret is missing or a test credential
//! cannot be signed and verified.

use std::process::ExitCode;
use token_service::services::credential_check::{check_credentials, SigningTrial, VarStatus};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_check=info".into()),
        )
        .with_target(false)
        .init();

    let vars = std::env::vars().collect();
    let report = check_credentials(&vars, chrono::Utc::now().timestamp());

    report_var(&report.key);
    report_var(&report.secret);

    match &report.signing {
        SigningTrial::Skipped => warn!("Signing test skipped: credentials incomplete"),
        SigningTrial::Verified { lifetime_secs } => {
            info!(lifetime_secs, "Test credential signed and verified")
        }
        SigningTrial::Failed(reason) => error!(%reason, "Test credential failed"),
    }

    if report.passed() {
        info!("Credentials look good");
        ExitCode::SUCCESS
    } else {
        error!("Credential check failed");
        ExitCode::FAILURE
    }
}

fn report_var(status: &VarStatus) {
    if !status.present {
        error!(var = status.name, "Not set");
        return;
    }
    // Values are never printed; length is enough to spot truncation.
    info!(var = status.name, length = status.length, "Set");
    if !status.charset_ok {
        warn!(
            var = status.name,
            "Contains characters outside [A-Za-z0-9_-]; check for stray quotes or whitespace"
        );
    }
}

//! Offline check of the configured signing material.
//!
//! Used by the `credential-check` binary to tell an operator, before they
//! start the service, whether `SDK_KEY`/`SDK_SECRET` are present, look
//! well formed, and can actually sign and verify a credential.

use crate::config::{SIGNING_KEY_VAR, SIGNING_SECRET_VAR};
use crate::crypto;
use common::jwt::{SessionClaims, DEFAULT_ROLE_TYPE};
use common::secret::SecretString;
use std::collections::HashMap;

/// Lifetime of the throwaway credential signed during the check.
pub const CHECK_CREDENTIAL_TTL_SECS: i64 = 3600;

const CHECK_SESSION: &str = "test-session";
const CHECK_IDENTITY: &str = "test-user";

/// Presence and shape of one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarStatus {
    pub name: &'static str,
    pub present: bool,
    pub length: usize,
    /// Only `[A-Za-z0-9_-]` characters.
    pub charset_ok: bool,
}

impl VarStatus {
    fn inspect(name: &'static str, vars: &HashMap<String, String>) -> Self {
        let value = vars.get(name).map(String::as_str).unwrap_or_default();
        Self {
            name,
            present: !value.is_empty(),
            length: value.len(),
            charset_ok: !value.is_empty() && has_credential_charset(value),
        }
    }
}

/// Outcome of the sign-then-verify round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningTrial {
    /// Skipped because key or secret is missing.
    Skipped,
    Verified { lifetime_secs: i64 },
    Failed(String),
}

/// Full diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialReport {
    pub key: VarStatus,
    pub secret: VarStatus,
    pub signing: SigningTrial,
}

impl CredentialReport {
    /// Both variables present and the signing trial verified.
    ///
    /// Charset warnings do not fail the check.
    pub fn passed(&self) -> bool {
        self.key.present
            && self.secret.present
            && matches!(self.signing, SigningTrial::Verified { .. })
    }
}

/// `^[A-Za-z0-9_-]+$`
pub fn has_credential_charset(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Inspect `vars` and run the signing trial at time `now`.
pub fn check_credentials(vars: &HashMap<String, String>, now: i64) -> CredentialReport {
    let key = VarStatus::inspect(SIGNING_KEY_VAR, vars);
    let secret = VarStatus::inspect(SIGNING_SECRET_VAR, vars);

    let signing = match (vars.get(SIGNING_KEY_VAR), vars.get(SIGNING_SECRET_VAR)) {
        (Some(key_id), Some(secret_value)) if key.present && secret.present => {
            run_signing_trial(key_id, &SecretString::from(secret_value.clone()), now)
        }
        _ => SigningTrial::Skipped,
    };

    CredentialReport { key, secret, signing }
}

fn run_signing_trial(key_id: &str, secret: &SecretString, now: i64) -> SigningTrial {
    let mut claims = SessionClaims::new(
        Some(key_id.to_string()),
        CHECK_SESSION.to_string(),
        CHECK_IDENTITY.to_string(),
        DEFAULT_ROLE_TYPE,
        now,
    );
    claims.exp = now + CHECK_CREDENTIAL_TTL_SECS;

    let token = match crypto::sign_credential(&claims, secret) {
        Ok(token) => token,
        Err(e) => return SigningTrial::Failed(e.to_string()),
    };

    match crypto::verify_credential(&token, secret) {
        Ok(decoded) if decoded == claims => SigningTrial::Verified {
            lifetime_secs: decoded.lifetime_secs(),
        },
        Ok(_) => SigningTrial::Failed("decoded claims differ from signed claims".to_string()),
        Err(e) => SigningTrial::Failed(e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn test_charset() {
        assert!(has_credential_charset("abc_DEF-123"));
        assert!(!has_credential_charset("abc def"));
        assert!(!has_credential_charset("key=="));
        assert!(!has_credential_charset(""));
    }

    #[test]
    fn test_complete_configuration_passes() {
        let report = check_credentials(&vars(&[("SDK_KEY", "key_1"), ("SDK_SECRET", "s3cret")]), now());

        assert!(report.key.present);
        assert_eq!(report.secret.length, 6);
        assert_eq!(
            report.signing,
            SigningTrial::Verified {
                lifetime_secs: CHECK_CREDENTIAL_TTL_SECS
            }
        );
        assert!(report.passed());
    }

    #[test]
    fn test_missing_secret_skips_signing_trial_and_fails() {
        let report = check_credentials(&vars(&[("SDK_KEY", "key_1")]), now());

        assert!(!report.secret.present);
        assert_eq!(report.signing, SigningTrial::Skipped);
        assert!(!report.passed());
    }

    #[test]
    fn test_odd_charset_is_reported_but_not_fatal() {
        let report = check_credentials(&vars(&[("SDK_KEY", "key 1"), ("SDK_SECRET", "secret")]), now());

        assert!(!report.key.charset_ok);
        assert!(report.secret.charset_ok);
        assert!(report.passed());
    }

    #[test]
    fn test_report_never_carries_secret_value() {
        let report = check_credentials(&vars(&[("SDK_KEY", "k"), ("SDK_SECRET", "very-private")]), now());
        assert!(!format!("{report:?}").contains("very-private"));
    }
}

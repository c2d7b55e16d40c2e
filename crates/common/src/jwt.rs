//! Session credential claims shared by the issuer and its consumers.
//!
//! A session credential is an HS256 JWT asserting a room (`tpc`), a
//! participant identity and a numeric role. The video SDK treats it as an
//! opaque bearer string; the claim names are dictated by the SDK vendor.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted on decode
//! - `user_identity` is redacted in Debug output

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Lifetime of an issued session credential (2 hours).
pub const CREDENTIAL_TTL_SECS: i64 = 7200;

/// Role assigned when the caller does not request one (host).
pub const DEFAULT_ROLE_TYPE: u8 = 1;

/// Claims layout version expected by the SDK.
pub const CLAIMS_VERSION: u32 = 1;

/// Maximum credential size accepted by [`decode_session_claims`] (4KB).
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

// =============================================================================
// Error Types
// =============================================================================

/// Errors returned when decoding a session credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialDecodeError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("Credential is too large")]
    TooLarge,

    /// Signature, structure or expiry check failed.
    #[error("Credential is invalid or expired: {0}")]
    Invalid(String),
}

// =============================================================================
// Claims Types
// =============================================================================

/// Claims embedded in a session credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Signing key identifier (the SDK key). Omitted from the token when
    /// the issuer has no key id configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,

    /// Room / session name ("topic").
    pub tpc: String,

    /// Numeric role; 1 is host.
    pub role_type: u8,

    /// Participant identity - redacted in Debug output.
    pub user_identity: String,

    /// Claims layout version.
    pub version: u32,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("app_key", &self.app_key)
            .field("tpc", &self.tpc)
            .field("role_type", &self.role_type)
            .field("user_identity", &"[REDACTED]")
            .field("version", &self.version)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl SessionClaims {
    /// Build claims issued at `iat`, expiring [`CREDENTIAL_TTL_SECS`] later.
    #[must_use]
    pub fn new(app_key: Option<String>, tpc: String, user_identity: String, role_type: u8, iat: i64) -> Self {
        Self {
            app_key,
            tpc,
            role_type,
            user_identity,
            version: CLAIMS_VERSION,
            iat,
            exp: iat + CREDENTIAL_TTL_SECS,
        }
    }

    /// Seconds between issuance and expiry.
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        self.exp - self.iat
    }
}

/// Decode and verify a session credential signed with `secret`.
///
/// Validates the HS256 signature and the `exp` claim.
///
/// # Errors
///
/// - [`CredentialDecodeError::TooLarge`] before any parsing when oversized
/// - [`CredentialDecodeError::Invalid`] on any signature/format/expiry failure
pub fn decode_session_claims(token: &str, secret: &str) -> Result<SessionClaims, CredentialDecodeError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        return Err(CredentialDecodeError::TooLarge);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);

    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| CredentialDecodeError::Invalid(e.to_string()))
}

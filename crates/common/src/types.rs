//! Wire types for `POST /api/token`.
//!
//! Field names are camelCase on the wire to match the browser-facing API.

use serde::{Deserialize, Serialize};

/// Body of a credential request.
///
/// Both name fields are optional at the serde level so that a missing field
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Room / session name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,

    /// Participant identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_identity: Option<String>,

    /// Requested numeric role (defaults to host when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type: Option<u8>,
}

impl TokenRequest {
    /// Convenience constructor for a fully populated request.
    #[must_use]
    pub fn new(session_name: &str, user_identity: &str, role_type: Option<u8>) -> Self {
        Self {
            session_name: Some(session_name.to_string()),
            user_identity: Some(user_identity.to_string()),
            role_type,
        }
    }
}

/// Successful credential response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed credential.
    pub token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Error body returned for 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

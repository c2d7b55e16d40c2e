//! Token service error types.
//!
//! Response bodies are the flat `{ "error": "..." }` shape the browser client
//! expects. Underlying causes are logged server-side and never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::ErrorBody;
use thiserror::Error;

/// Message returned when a required request field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "sessionName and userIdentity are required";

/// Message returned when signing fails.
pub const SIGNING_FAILED_MESSAGE: &str = "Token generation failed";

/// Errors from [`crate::services::CredentialIssuer`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// Room name or participant identity missing/empty. No signing attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Signing material unavailable or the signing operation failed.
    #[error("Signing error: {0}")]
    Signing(String),
}

/// HTTP-facing error type.
///
/// Maps to:
/// - BadRequest: 400
/// - SigningFailed: 500
#[derive(Debug, Error)]
pub enum TokenServiceError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

impl TokenServiceError {
    /// Returns the HTTP status code for this error (recorded on the request span).
    pub fn status_code(&self) -> u16 {
        match self {
            TokenServiceError::BadRequest(_) => 400,
            TokenServiceError::SigningFailed(_) => 500,
        }
    }
}

impl From<IssueError> for TokenServiceError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::Validation(reason) => TokenServiceError::BadRequest(reason),
            IssueError::Signing(reason) => TokenServiceError::SigningFailed(reason),
        }
    }
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TokenServiceError::BadRequest(reason) => {
                tracing::debug!(target: "token.errors", reason = %reason, "Rejected token request");
                (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE)
            }
            TokenServiceError::SigningFailed(reason) => {
                tracing::error!(target: "token.errors", reason = %reason, "Credential signing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SIGNING_FAILED_MESSAGE)
            }
        };

        let body = ErrorBody {
            error: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: TokenServiceError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_400_with_fixed_message() {
        let (status, body) = body_of(TokenServiceError::BadRequest("sessionName is empty".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "sessionName and userIdentity are required");
    }

    #[tokio::test]
    async fn test_signing_failure_hides_reason() {
        let (status, body) = body_of(TokenServiceError::SigningFailed("secret not configured".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Token generation failed");
    }

    #[test]
    fn test_issue_error_conversion() {
        assert!(matches!(
            TokenServiceError::from(IssueError::Validation("x".to_string())),
            TokenServiceError::BadRequest(_)
        ));
        assert!(matches!(
            TokenServiceError::from(IssueError::Signing("x".to_string())),
            TokenServiceError::SigningFailed(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TokenServiceError::BadRequest(String::new()).status_code(), 400);
        assert_eq!(TokenServiceError::SigningFailed(String::new()).status_code(), 500);
    }
}

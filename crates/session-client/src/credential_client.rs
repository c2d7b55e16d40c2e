//! Credential issuer HTTP client.
//!
//! Requests a session credential from `POST {issuer}/api/token`.
//!
//! # Security
//!
//! - The returned credential is wrapped in `SecretString` and never logged
//! - Timeouts prevent a hung issuer from blocking a join forever

use crate::errors::SessionError;
use async_trait::async_trait;
use common::secret::SecretString;
use common::types::{ErrorBody, TokenRequest, TokenResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Default timeout for issuer requests in seconds.
const ISSUER_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default connect timeout in seconds.
const ISSUER_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Source of session credentials.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Request a credential for `request`.
    ///
    /// # Errors
    ///
    /// `SessionError::CredentialRequest` on network failure or a non-2xx
    /// response.
    async fn request_credential(&self, request: &TokenRequest) -> Result<SecretString, SessionError>;
}

/// HTTP client for the credential issuer.
#[derive(Clone)]
pub struct HttpCredentialClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Issuer base URL, e.g. "http://localhost:3000".
    base_url: String,
}

impl HttpCredentialClient {
    /// Create a new issuer client.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CredentialRequest` if the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(ISSUER_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(ISSUER_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!(target: "session.credential_client", error = %e, "Failed to build HTTP client");
                SessionError::CredentialRequest("HTTP client unavailable".to_string())
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map the issuer response to a credential or an error.
    async fn handle_response(response: reqwest::Response) -> Result<SecretString, SessionError> {
        let status = response.status();

        if status.is_success() {
            let body: TokenResponse = response.json().await.map_err(|e| {
                error!(target: "session.credential_client", error = %e, "Failed to parse issuer response");
                SessionError::CredentialRequest("Malformed issuer response".to_string())
            })?;
            return Ok(SecretString::from(body.token));
        }

        // The issuer reports failures as `{ "error": "..." }`; fall back to
        // the status line when the body is something else.
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        if status.is_server_error() {
            warn!(target: "session.credential_client", status = %status, message = %message, "Issuer returned server error");
        } else {
            warn!(target: "session.credential_client", status = %status, message = %message, "Issuer rejected request");
        }

        Err(SessionError::CredentialRequest(message))
    }
}

#[async_trait]
impl CredentialSource for HttpCredentialClient {
    #[instrument(skip_all, fields(session_name = ?request.session_name))]
    async fn request_credential(&self, request: &TokenRequest) -> Result<SecretString, SessionError> {
        let url = format!("{}/api/token", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "session.credential_client", error = %e, "Issuer request failed");
                SessionError::CredentialRequest("Credential issuer is unavailable".to_string())
            })?;

        Self::handle_response(response).await
    }
}

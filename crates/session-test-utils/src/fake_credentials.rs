//! Scriptable credential source.

use async_trait::async_trait;
use common::secret::SecretString;
use common::types::TokenRequest;
use session_client::{CredentialSource, SessionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Fake credential source for controller tests.
pub struct FakeCredentialSource {
    token: Option<String>,
    error: Option<String>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    last_request: Mutex<Option<TokenRequest>>,
}

impl FakeCredentialSource {
    /// Always issue `token`.
    pub fn issuing(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            error: None,
            delay: None,
            call_count: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always fail with `SessionError::CredentialRequest(message)`.
    pub fn failing(message: &str) -> Self {
        Self {
            token: None,
            error: Some(message.to_string()),
            delay: None,
            call_count: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Sleep before answering, to keep a join in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TokenRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialSource for FakeCredentialSource {
    async fn request_credential(&self, request: &TokenRequest) -> Result<SecretString, SessionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match (&self.token, &self.error) {
            (Some(token), _) => Ok(SecretString::from(token.clone())),
            (None, Some(message)) => Err(SessionError::CredentialRequest(message.clone())),
            (None, None) => Err(SessionError::CredentialRequest("no token configured".to_string())),
        }
    }
}

//! Session credential issuance.
//!
//! Stateless: every call builds fresh claims and signs them. Validation
//! happens before the signing material is even looked at, so a bad request
//! never reaches the signer.

use crate::config::Config;
use crate::crypto;
use crate::errors::IssueError;
use common::jwt::{SessionClaims, DEFAULT_ROLE_TYPE};
use common::secret::SecretString;
use std::fmt;
use tracing::{debug, instrument};

/// A freshly issued credential together with the claims it carries.
pub struct IssuedCredential {
    /// The signed bearer string.
    pub token: String,
    /// Claims embedded in `token`.
    pub claims: SessionClaims,
}

impl fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Issues signed, time-bounded session credentials.
#[derive(Clone)]
pub struct CredentialIssuer {
    key_id: Option<String>,
    secret: Option<SecretString>,
}

impl fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("key_id", &self.key_id)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CredentialIssuer {
    pub fn new(key_id: Option<String>, secret: Option<SecretString>) -> Self {
        Self { key_id, secret }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.signing_key_id.clone(), config.signing_secret.clone())
    }

    /// Issue a credential stamped with the current time.
    pub fn issue(
        &self,
        room: Option<&str>,
        identity: Option<&str>,
        role: Option<u8>,
    ) -> Result<IssuedCredential, IssueError> {
        self.issue_at(chrono::Utc::now().timestamp(), room, identity, role)
    }

    /// Issue a credential with an explicit issued-at time.
    ///
    /// # Errors
    ///
    /// - `IssueError::Validation` if `room` or `identity` is absent or blank
    /// - `IssueError::Signing` if the secret is not configured or the signing
    ///   operation fails
    ///
    /// A role of `0` is treated as absent and becomes the default role. A
    /// missing key id only omits `app_key` from the claims.
    #[instrument(skip_all, fields(role))]
    pub fn issue_at(
        &self,
        now: i64,
        room: Option<&str>,
        identity: Option<&str>,
        role: Option<u8>,
    ) -> Result<IssuedCredential, IssueError> {
        let room = non_blank(room)
            .ok_or_else(|| IssueError::Validation("sessionName is missing".to_string()))?;
        let identity = non_blank(identity)
            .ok_or_else(|| IssueError::Validation("userIdentity is missing".to_string()))?;
        let role = role.filter(|r| *r != 0).unwrap_or(DEFAULT_ROLE_TYPE);
        tracing::Span::current().record("role", role);

        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| IssueError::Signing("signing secret is not configured".to_string()))?;

        let claims = SessionClaims::new(
            self.key_id.clone(),
            room.to_string(),
            identity.to_string(),
            role,
            now,
        );

        let token = crypto::sign_credential(&claims, secret)?;

        debug!(
            target: "token.issuer",
            room = %claims.tpc,
            role_type = claims.role_type,
            exp = claims.exp,
            "Credential issued"
        );

        Ok(IssuedCredential { token, claims })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

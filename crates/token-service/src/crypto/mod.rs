use crate::errors::IssueError;
use common::jwt::{decode_session_claims, CredentialDecodeError, SessionClaims};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::instrument;

/// Sign session claims with the HS256 shared secret.
///
/// An empty secret is rejected up front; `jsonwebtoken` would otherwise
/// happily produce a MAC keyed on zero bytes.
#[instrument(skip_all)]
pub fn sign_credential(claims: &SessionClaims, secret: &SecretString) -> Result<String, IssueError> {
    let secret_bytes = secret.expose_secret().as_bytes();
    if secret_bytes.is_empty() {
        tracing::error!(target: "crypto", "Signing secret is empty");
        return Err(IssueError::Signing("signing secret is empty".to_string()));
    }

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &EncodingKey::from_secret(secret_bytes)).map_err(|e| {
        tracing::error!(target: "crypto", error = %e, "JWT signing operation failed");
        IssueError::Signing(format!("JWT signing operation failed: {}", e))
    })
}

/// Verify a credential's signature and expiry and return its claims.
pub fn verify_credential(
    token: &str,
    secret: &SecretString,
) -> Result<SessionClaims, CredentialDecodeError> {
    decode_session_claims(token, secret.expose_secret())
}

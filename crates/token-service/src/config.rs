//! Token service configuration.
//!
//! Configuration is loaded from environment variables. The signing secret
//! is held as a `SecretString` and redacted in Debug output.
//!
//! The signing key id and secret are deliberately optional at load time: the
//! service starts without them and every issuance request then fails with a
//! signing error, which is what operators see in the logs.

use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Environment variable holding the signing key identifier.
pub const SIGNING_KEY_VAR: &str = "SDK_KEY";

/// Environment variable holding the signing secret.
pub const SIGNING_SECRET_VAR: &str = "SDK_SECRET";

/// Token service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// Signing key identifier, embedded as `app_key` when present.
    pub signing_key_id: Option<String>,

    /// Signing secret for HS256.
    pub signing_secret: Option<SecretString>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("signing_key_id", &self.signing_key_id)
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = match vars.get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidPort(format!("PORT must be 0-65535, got '{}': {}", value, e))
            })?,
            None => DEFAULT_PORT,
        };

        let host = vars
            .get("BIND_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let signing_key_id = vars
            .get(SIGNING_KEY_VAR)
            .filter(|v| !v.is_empty())
            .cloned();

        let signing_secret = vars
            .get(SIGNING_SECRET_VAR)
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::from(v.clone()));

        Ok(Config {
            bind_address: format!("{}:{}", host, port),
            signing_key_id,
            signing_secret,
        })
    }

    /// Whether a non-empty signing secret is present. The key id is
    /// optional; without it credentials carry no `app_key`.
    pub fn has_signing_material(&self) -> bool {
        self.signing_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }
}

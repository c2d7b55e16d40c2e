//! Session client configuration.
//!
//! Loaded from environment variables so the same controller can point at a
//! local issuer in development and a deployed one elsewhere.

use crate::readiness::ReadinessPolicy;
use common::jwt::DEFAULT_ROLE_TYPE;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default credential issuer base URL.
pub const DEFAULT_ISSUER_URL: &str = "http://localhost:3000";

/// Default interval between SDK readiness checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default readiness bound for the SDK.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 100;

/// Default readiness bound for the widget toolkit, which loads a larger bundle.
pub const WIDGET_POLL_MAX_ATTEMPTS: u32 = 200;

/// Default SDK locale.
pub const DEFAULT_SDK_LANGUAGE: &str = "ja-JP";

/// Locale passed to the widget toolkit.
pub const WIDGET_SDK_LANGUAGE: &str = "en-US";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Session client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClientConfig {
    /// Base URL of the credential issuer, without trailing slash.
    pub issuer_url: String,

    /// Interval between readiness checks.
    pub poll_interval: Duration,

    /// Maximum readiness checks after the initial one.
    pub poll_max_attempts: u32,

    /// Readiness bound used by the widget controller.
    pub widget_poll_max_attempts: u32,

    /// Locale handed to `init`.
    pub sdk_language: String,

    /// Role requested for every credential.
    pub role_type: u8,

    /// Start local audio and video right after joining.
    pub auto_start_media: bool,
}

impl Default for SessionClientConfig {
    fn default() -> Self {
        Self {
            issuer_url: DEFAULT_ISSUER_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            widget_poll_max_attempts: WIDGET_POLL_MAX_ATTEMPTS,
            sdk_language: DEFAULT_SDK_LANGUAGE.to_string(),
            role_type: DEFAULT_ROLE_TYPE,
            auto_start_media: false,
        }
    }
}

impl SessionClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let issuer_url = vars
            .get("TOKEN_ISSUER_URL")
            .filter(|v| !v.is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.issuer_url);

        let poll_interval = match vars.get("SDK_POLL_INTERVAL_MS") {
            Some(value) => {
                let ms = parse_var::<u64>("SDK_POLL_INTERVAL_MS", value)?;
                if ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        var: "SDK_POLL_INTERVAL_MS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => defaults.poll_interval,
        };

        let poll_max_attempts = match vars.get("SDK_POLL_MAX_ATTEMPTS") {
            Some(value) => parse_var("SDK_POLL_MAX_ATTEMPTS", value)?,
            None => defaults.poll_max_attempts,
        };

        let widget_poll_max_attempts = match vars.get("WIDGET_POLL_MAX_ATTEMPTS") {
            Some(value) => parse_var("WIDGET_POLL_MAX_ATTEMPTS", value)?,
            None => defaults.widget_poll_max_attempts,
        };

        let sdk_language = vars
            .get("SDK_LANGUAGE")
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or(defaults.sdk_language);

        let role_type = match vars.get("SESSION_ROLE_TYPE") {
            Some(value) => parse_var("SESSION_ROLE_TYPE", value)?,
            None => defaults.role_type,
        };

        let auto_start_media = match vars.get("AUTO_START_MEDIA") {
            Some(value) => parse_bool("AUTO_START_MEDIA", value)?,
            None => defaults.auto_start_media,
        };

        Ok(Self {
            issuer_url,
            poll_interval,
            poll_max_attempts,
            widget_poll_max_attempts,
            sdk_language,
            role_type,
            auto_start_media,
        })
    }

    /// Readiness bound for the SDK.
    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(self.poll_interval, self.poll_max_attempts)
    }

    /// Readiness bound for the widget toolkit.
    pub fn widget_readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(self.poll_interval, self.widget_poll_max_attempts)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        var,
        reason: format!("'{}': {}", value, e),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            var,
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}

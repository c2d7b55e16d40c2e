//! Session controller error types.
//!
//! Every variant is scoped to one user action. None of them leaves the
//! controller in an intermediate state: a failed join returns to `Idle`, a
//! failed toggle stays `Joined`, a failed leave is reported after the reset.

use std::fmt;
use thiserror::Error;

/// Which local capture stream an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// Error reported by an SDK or widget adapter.
///
/// Carries the vendor's message verbatim; the controller surfaces it to the
/// user inside the matching [`SessionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SdkError(pub String);

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors returned by the session controllers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Room name or display name missing. No network call was made.
    #[error("Session name and display name are required")]
    InputValidation,

    /// Issuer unreachable or returned a non-2xx status.
    #[error("Credential request failed: {0}")]
    CredentialRequest(String),

    /// The SDK did not become available within the readiness bound.
    #[error("SDK did not load after {attempts} checks")]
    SdkLoadTimeout { attempts: u32 },

    /// The SDK loaded but lacks an operation the controller depends on.
    #[error("SDK is missing required capabilities: {0}")]
    SdkCapability(String),

    /// Client creation, `init` or `join` was rejected.
    #[error("Failed to join session: {0}")]
    SdkJoin(String),

    /// Start/stop of a capture stream was rejected. Non-fatal.
    #[error("Failed to toggle {kind}: {reason}")]
    MediaToggle { kind: MediaKind, reason: String },

    /// The SDK rejected `leave`. The controller has already been reset.
    #[error("Leave failed: {0}")]
    Leave(String),

    /// A join is still in flight.
    #[error("A join is already in progress")]
    JoinInProgress,

    /// The controller is already in a session.
    #[error("Already joined a session")]
    AlreadyJoined,

    /// The in-flight join was cancelled by the caller.
    #[error("Join was cancelled")]
    Cancelled,
}

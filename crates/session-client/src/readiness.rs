//! Bounded readiness wait.
//!
//! One reusable primitive for "poll an availability check until it yields a
//! value, at a fixed interval, at most N times". Used for both the SDK and
//! the widget toolkit.
//!
//! The check runs once immediately; when it already yields, the wait returns
//! without touching the timer. Otherwise it sleeps `interval` between up to
//! `max_attempts` further checks, so the total wait never exceeds
//! `interval * max_attempts`. Dropping the future, hitting the bound, or
//! cancelling the token all end the loop with nothing left scheduled.

use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Interval and attempt bound for a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl ReadinessPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Upper bound on the time spent waiting.
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 100)
    }
}

/// A value the check produced, with the number of timed checks it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ready<T> {
    pub value: T,
    /// `0` when the value was available on the immediate check.
    pub polls: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadinessError {
    #[error("not ready after {attempts} checks")]
    TimedOut { attempts: u32 },

    #[error("readiness wait cancelled")]
    Cancelled,
}

/// Wait until `check` yields a value.
///
/// # Errors
///
/// - `ReadinessError::TimedOut` once `policy.max_attempts` timed checks
///   have all come back empty
/// - `ReadinessError::Cancelled` if `cancel` fires first
pub async fn wait_for<T, F>(
    policy: ReadinessPolicy,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<Ready<T>, ReadinessError>
where
    F: FnMut() -> Option<T>,
{
    if cancel.is_cancelled() {
        return Err(ReadinessError::Cancelled);
    }

    if let Some(value) = check() {
        return Ok(Ready { value, polls: 0 });
    }

    for attempt in 1..=policy.max_attempts {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(target: "session.readiness", attempt, "Readiness wait cancelled");
                return Err(ReadinessError::Cancelled);
            }
            () = tokio::time::sleep(policy.interval) => {}
        }

        if let Some(value) = check() {
            debug!(target: "session.readiness", polls = attempt, "Capability became available");
            return Ok(Ready {
                value,
                polls: attempt,
            });
        }
    }

    warn!(
        target: "session.readiness",
        attempts = policy.max_attempts,
        interval_ms = u64::try_from(policy.interval.as_millis()).unwrap_or(u64::MAX),
        "Capability did not become available"
    );
    Err(ReadinessError::TimedOut {
        attempts: policy.max_attempts,
    })
}

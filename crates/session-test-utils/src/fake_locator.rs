//! Locator that becomes available after a set number of checks.

use session_client::sdk::{SdkLocator, VideoSdk};
use session_client::widget::{WidgetLocator, WidgetToolkit};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Fake locator for the SDK or the widget toolkit.
///
/// Returns `None` for the first `available_after` checks and the value on
/// every check after that. `never()` stays unavailable.
pub struct FakeLocator<T> {
    value: T,
    available_after: Option<u32>,
    checks: AtomicU32,
}

impl<T: Clone> FakeLocator<T> {
    /// Available on the first check.
    pub fn present(value: T) -> Self {
        Self::available_after(value, 0)
    }

    /// Unavailable for the first `checks` checks.
    pub fn available_after(value: T, checks: u32) -> Self {
        Self {
            value,
            available_after: Some(checks),
            checks: AtomicU32::new(0),
        }
    }

    /// Never available.
    pub fn never(value: T) -> Self {
        Self {
            value,
            available_after: None,
            checks: AtomicU32::new(0),
        }
    }

    /// Number of times the locator has been checked.
    pub fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    fn check(&self) -> Option<T> {
        let previous = self.checks.fetch_add(1, Ordering::SeqCst);
        match self.available_after {
            Some(after) if previous >= after => Some(self.value.clone()),
            _ => None,
        }
    }
}

impl SdkLocator for FakeLocator<Arc<dyn VideoSdk>> {
    fn locate(&self) -> Option<Arc<dyn VideoSdk>> {
        self.check()
    }
}

impl WidgetLocator for FakeLocator<Arc<dyn WidgetToolkit>> {
    fn locate(&self) -> Option<Arc<dyn WidgetToolkit>> {
        self.check()
    }
}

//! Fake widget toolkit.

use async_trait::async_trait;
use session_client::widget::{
    WidgetEvent, WidgetEventHandler, WidgetEventKind, WidgetLifecycle, WidgetSessionConfig,
    WidgetToolkit,
};
use session_client::SdkError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Callback registry exposing a chosen subset of lifecycle events.
pub struct FakeWidgetHooks {
    supported: HashSet<WidgetEventKind>,
    handlers: Mutex<HashMap<WidgetEventKind, Vec<WidgetEventHandler>>>,
}

impl FakeWidgetHooks {
    pub fn supporting(kinds: &[WidgetEventKind]) -> Self {
        Self {
            supported: kinds.iter().copied().collect(),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    fn emit(&self, event: WidgetEvent) {
        let kind = match &event {
            WidgetEvent::SessionJoined => WidgetEventKind::SessionJoined,
            WidgetEvent::SessionLeft => WidgetEventKind::SessionLeft,
            WidgetEvent::UserJoined { .. } => WidgetEventKind::UserJoined,
            WidgetEvent::UserLeft { .. } => WidgetEventKind::UserLeft,
        };
        let handlers = self
            .handlers
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

impl WidgetLifecycle for FakeWidgetHooks {
    fn subscribe(&self, kind: WidgetEventKind, handler: WidgetEventHandler) -> bool {
        if !self.supported.contains(&kind) {
            return false;
        }
        self.handlers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(handler);
        true
    }
}

/// Fake widget toolkit. Cheap to clone; clones share recorded state.
#[derive(Clone)]
pub struct FakeWidgetToolkit {
    inner: Arc<Inner>,
}

struct Inner {
    hooks: Option<FakeWidgetHooks>,
    join_error: Option<String>,
    leave_error: Option<String>,
    emit_left_on_leave: bool,
    join_delay: Option<Duration>,
    joins: Mutex<Vec<WidgetSessionConfig>>,
    leave_count: AtomicUsize,
}

impl FakeWidgetToolkit {
    /// Exposes every lifecycle callback; join and leave succeed.
    pub fn new() -> Self {
        Self::build(Some(FakeWidgetHooks::supporting(&WidgetEventKind::ALL)), None, None, false, None)
    }

    /// Exposes no lifecycle callbacks.
    pub fn without_hooks() -> Self {
        Self::build(None, None, None, false, None)
    }

    /// Exposes only `kinds`.
    pub fn with_hooks(kinds: &[WidgetEventKind]) -> Self {
        Self::build(Some(FakeWidgetHooks::supporting(kinds)), None, None, false, None)
    }

    pub fn failing_join(message: &str) -> Self {
        Self::build(
            Some(FakeWidgetHooks::supporting(&WidgetEventKind::ALL)),
            Some(message.to_string()),
            None,
            false,
            None,
        )
    }

    pub fn failing_leave(message: &str) -> Self {
        Self::build(
            Some(FakeWidgetHooks::supporting(&WidgetEventKind::ALL)),
            None,
            Some(message.to_string()),
            false,
            None,
        )
    }

    /// Fire the session-left callback from inside `leave_session`, the way
    /// the real widget does.
    pub fn emitting_left_on_leave() -> Self {
        Self::build(Some(FakeWidgetHooks::supporting(&WidgetEventKind::ALL)), None, None, true, None)
    }

    fn build(
        hooks: Option<FakeWidgetHooks>,
        join_error: Option<String>,
        leave_error: Option<String>,
        emit_left_on_leave: bool,
        join_delay: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                hooks,
                join_error,
                leave_error,
                emit_left_on_leave,
                join_delay,
                joins: Mutex::new(Vec::new()),
                leave_count: AtomicUsize::new(0),
            }),
        }
    }

    /// All hooks; `join_session` takes `delay` to answer.
    pub fn joining_after(delay: Duration) -> Self {
        Self::build(
            Some(FakeWidgetHooks::supporting(&WidgetEventKind::ALL)),
            None,
            None,
            false,
            Some(delay),
        )
    }

    /// This fake as the trait object a locator hands out.
    pub fn handle(&self) -> Arc<dyn WidgetToolkit> {
        Arc::new(self.clone())
    }

    /// Configs passed to `join_session`, oldest first.
    pub fn joins(&self) -> Vec<WidgetSessionConfig> {
        self.inner.joins.lock().unwrap().clone()
    }

    pub fn leave_count(&self) -> usize {
        self.inner.leave_count.load(Ordering::SeqCst)
    }

    /// Fire a lifecycle callback. No-op when hooks are absent.
    pub fn emit(&self, event: WidgetEvent) {
        if let Some(hooks) = &self.inner.hooks {
            hooks.emit(event);
        }
    }
}

impl Default for FakeWidgetToolkit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WidgetToolkit for FakeWidgetToolkit {
    async fn join_session(&self, config: &WidgetSessionConfig) -> Result<(), SdkError> {
        self.inner.joins.lock().unwrap().push(config.clone());
        if let Some(delay) = self.inner.join_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.inner.join_error {
            Some(message) => Err(SdkError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn leave_session(&self) -> Result<(), SdkError> {
        self.inner.leave_count.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.inner.leave_error {
            return Err(SdkError::new(message.clone()));
        }
        if self.inner.emit_left_on_leave {
            self.emit(WidgetEvent::SessionLeft);
        }
        Ok(())
    }

    fn lifecycle_hooks(&self) -> Option<&dyn WidgetLifecycle> {
        self.inner
            .hooks
            .as_ref()
            .map(|hooks| hooks as &dyn WidgetLifecycle)
    }
}

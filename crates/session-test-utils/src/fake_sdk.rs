//! In-memory fake of the video SDK.
//!
//! `FakeSdk` is a cheap handle: clone it into the locator and keep a copy in
//! the test to inspect created clients and emit events.
//!
//! # Example
//!
//! ```rust,ignore
//! let sdk = FakeSdk::with_behavior(ClientBehavior {
//!     join_error: Some("invalid signature".to_string()),
//!     ..ClientBehavior::default()
//! });
//! let locator = FakeLocator::present(sdk.handle());
//! ```

use async_trait::async_trait;
use session_client::sdk::{
    CapabilitySet, EventHandler, InitConfig, MediaStream, ParticipantId, SdkClient, SdkEvent,
    SdkEventKind, UserInfo, VideoSdk,
};
use session_client::SdkError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Participant id the fake assigns to the local user.
pub const FAKE_SELF_ID: ParticipantId = 1;

/// Scripted behaviour copied into every client the fake SDK creates.
#[derive(Debug, Clone, Default)]
pub struct ClientBehavior {
    pub create_error: Option<String>,
    pub init_error: Option<String>,
    pub join_error: Option<String>,
    pub leave_error: Option<String>,
    /// Report no local participant after joining.
    pub hide_self: bool,
    /// Media operations that fail from the moment the client exists.
    pub media_errors: Vec<MediaOp>,
    /// Sleep inside `join` before answering.
    pub join_delay: Option<Duration>,
    /// Sleep inside every media call before answering.
    pub media_delay: Option<Duration>,
}

/// Fake SDK entry point.
#[derive(Clone)]
pub struct FakeSdk {
    capabilities: CapabilitySet,
    behavior: ClientBehavior,
    clients: Arc<Mutex<Vec<Arc<FakeSdkClient>>>>,
}

impl Default for FakeSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSdk {
    /// Full capabilities, every call succeeds.
    pub fn new() -> Self {
        Self::with_behavior(ClientBehavior::default())
    }

    pub fn with_behavior(behavior: ClientBehavior) -> Self {
        Self {
            capabilities: CapabilitySet::full(),
            behavior,
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// This fake as the trait object a locator hands out.
    pub fn handle(&self) -> Arc<dyn VideoSdk> {
        Arc::new(self.clone())
    }

    /// Every client created so far, oldest first.
    pub fn clients(&self) -> Vec<Arc<FakeSdkClient>> {
        self.clients.lock().unwrap().clone()
    }

    /// Most recently created client. Panics if none was created.
    pub fn last_client(&self) -> Arc<FakeSdkClient> {
        self.clients
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no client has been created")
    }
}

impl VideoSdk for FakeSdk {
    fn capabilities(&self) -> CapabilitySet {
        self.capabilities.clone()
    }

    fn create_client(&self) -> Result<Arc<dyn SdkClient>, SdkError> {
        if let Some(message) = &self.behavior.create_error {
            return Err(SdkError::new(message.clone()));
        }
        let client = Arc::new(FakeSdkClient::new(self.behavior.clone()));
        self.clients.lock().unwrap().push(Arc::clone(&client));
        let client: Arc<dyn SdkClient> = client;
        Ok(client)
    }
}

/// A recorded call on a fake client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Init(InitConfig),
    Join {
        room: String,
        credential: String,
        display_name: String,
        passcode: Option<String>,
    },
    Leave,
}

/// Fake SDK client.
pub struct FakeSdkClient {
    behavior: ClientBehavior,
    calls: Mutex<Vec<SdkCall>>,
    handlers: Mutex<HashMap<SdkEventKind, Vec<EventHandler>>>,
    display_name: Mutex<Option<String>>,
    stream: Arc<FakeMediaStream>,
}

impl FakeSdkClient {
    fn new(behavior: ClientBehavior) -> Self {
        let stream = FakeMediaStream::with_delay(behavior.media_delay);
        for op in &behavior.media_errors {
            stream.fail(*op);
        }
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            handlers: Mutex::new(HashMap::new()),
            display_name: Mutex::new(None),
            stream: Arc::new(stream),
        }
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn leave_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SdkCall::Leave))
            .count()
    }

    /// The local media stream, for scripting capture failures.
    pub fn stream(&self) -> Arc<FakeMediaStream> {
        Arc::clone(&self.stream)
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: SdkEventKind) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler registered for its kind.
    pub fn emit(&self, event: SdkEvent) {
        let handlers = self
            .handlers
            .lock()
            .unwrap()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(event.clone());
        }
    }

    fn record(&self, call: SdkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SdkClient for FakeSdkClient {
    async fn init(&self, config: &InitConfig) -> Result<(), SdkError> {
        self.record(SdkCall::Init(config.clone()));
        match &self.behavior.init_error {
            Some(message) => Err(SdkError::new(message.clone())),
            None => Ok(()),
        }
    }

    async fn join(
        &self,
        room: &str,
        credential: &str,
        display_name: &str,
        passcode: Option<&str>,
    ) -> Result<(), SdkError> {
        self.record(SdkCall::Join {
            room: room.to_string(),
            credential: credential.to_string(),
            display_name: display_name.to_string(),
            passcode: passcode.map(str::to_string),
        });
        if let Some(delay) = self.behavior.join_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.behavior.join_error {
            return Err(SdkError::new(message.clone()));
        }
        *self.display_name.lock().unwrap() = Some(display_name.to_string());
        Ok(())
    }

    async fn leave(&self) -> Result<(), SdkError> {
        self.record(SdkCall::Leave);
        match &self.behavior.leave_error {
            Some(message) => Err(SdkError::new(message.clone())),
            None => Ok(()),
        }
    }

    fn media_stream(&self) -> Option<Arc<dyn MediaStream>> {
        let stream: Arc<dyn MediaStream> = self.stream.clone();
        Some(stream)
    }

    fn on(&self, kind: SdkEventKind, handler: EventHandler) {
        self.handlers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(handler);
    }

    fn current_user_info(&self) -> Option<UserInfo> {
        if self.behavior.hide_self {
            return None;
        }
        self.display_name
            .lock()
            .unwrap()
            .clone()
            .map(|display_name| UserInfo {
                user_id: FAKE_SELF_ID,
                display_name,
            })
    }
}

/// A media stream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaOp {
    StartVideo,
    StopVideo,
    StartAudio,
    StopAudio,
    AttachVideo,
}

/// Fake local capture with per-operation failure switches.
#[derive(Default)]
pub struct FakeMediaStream {
    failing: Mutex<HashSet<MediaOp>>,
    calls: Mutex<Vec<MediaOp>>,
    attached: Mutex<Vec<ParticipantId>>,
    delay: Option<Duration>,
}

impl FakeMediaStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(delay: Option<Duration>) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Make `op` fail until [`FakeMediaStream::succeed`] is called.
    pub fn fail(&self, op: MediaOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn succeed(&self, op: MediaOp) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn calls(&self) -> Vec<MediaOp> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attached(&self) -> Vec<ParticipantId> {
        self.attached.lock().unwrap().clone()
    }

    async fn run(&self, op: MediaOp) -> Result<(), SdkError> {
        self.calls.lock().unwrap().push(op);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(SdkError::new(format!("{op:?} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStream for FakeMediaStream {
    async fn start_video(&self) -> Result<(), SdkError> {
        self.run(MediaOp::StartVideo).await
    }

    async fn stop_video(&self) -> Result<(), SdkError> {
        self.run(MediaOp::StopVideo).await
    }

    async fn start_audio(&self) -> Result<(), SdkError> {
        self.run(MediaOp::StartAudio).await
    }

    async fn stop_audio(&self) -> Result<(), SdkError> {
        self.run(MediaOp::StopAudio).await
    }

    async fn attach_video(&self, user_id: ParticipantId) -> Result<(), SdkError> {
        self.run(MediaOp::AttachVideo).await?;
        self.attached.lock().unwrap().push(user_id);
        Ok(())
    }
}

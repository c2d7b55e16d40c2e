//! Widget variant of the session controller.
//!
//! The vendor's bundled UI widget owns rendering, roster and media. This
//! controller only gets the user in and out: credential, readiness wait,
//! one [`WidgetSessionConfig`], `join_session`/`leave_session`, and relaying
//! the widget's lifecycle callbacks into status messages.

use crate::config::{SessionClientConfig, WIDGET_SDK_LANGUAGE};
use crate::controller::{JoinRequest, SessionState};
use crate::credential_client::CredentialSource;
use crate::errors::{SdkError, SessionError};
use crate::readiness::{self, ReadinessError, ReadinessPolicy};
use crate::sdk::InitConfig;
use crate::view::{SessionView, StatusKind};
use async_trait::async_trait;
use common::secret::SecretString;
use common::types::TokenRequest;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Widget panels to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetFeature {
    Video,
    Audio,
    Users,
    Chat,
}

impl WidgetFeature {
    pub const DEFAULT: [WidgetFeature; 4] = [
        WidgetFeature::Video,
        WidgetFeature::Audio,
        WidgetFeature::Users,
        WidgetFeature::Chat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetFeature::Video => "video",
            WidgetFeature::Audio => "audio",
            WidgetFeature::Users => "users",
            WidgetFeature::Chat => "chat",
        }
    }
}

/// Auto-start behaviour for one capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaAutoStart {
    pub auto_start: bool,
    pub mute: bool,
}

/// Everything the widget needs to join, built once per attempt.
#[derive(Clone)]
pub struct WidgetSessionConfig {
    pub session_name: String,
    /// Empty when the session has no passcode.
    pub session_passcode: String,
    pub user_name: String,
    /// The signed credential.
    pub session_key: SecretString,
    pub user_identity: String,
    pub features: Vec<WidgetFeature>,
    pub init: InitConfig,
    pub audio: MediaAutoStart,
    pub video: MediaAutoStart,
}

impl fmt::Debug for WidgetSessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetSessionConfig")
            .field("session_name", &self.session_name)
            .field("session_passcode", &"[REDACTED]")
            .field("user_name", &self.user_name)
            .field("session_key", &"[REDACTED]")
            .field("user_identity", &self.user_identity)
            .field("features", &self.features)
            .field("init", &self.init)
            .field("audio", &self.audio)
            .field("video", &self.video)
            .finish()
    }
}

/// Lifecycle callback categories a widget may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEventKind {
    SessionJoined,
    SessionLeft,
    UserJoined,
    UserLeft,
}

impl WidgetEventKind {
    pub const ALL: [WidgetEventKind; 4] = [
        WidgetEventKind::SessionJoined,
        WidgetEventKind::SessionLeft,
        WidgetEventKind::UserJoined,
        WidgetEventKind::UserLeft,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    SessionJoined,
    SessionLeft,
    UserJoined { display_name: String },
    UserLeft { display_name: String },
}

pub type WidgetEventHandler = Arc<dyn Fn(WidgetEvent) + Send + Sync>;

/// Optional callback registration surface of a widget build.
pub trait WidgetLifecycle: Send + Sync {
    /// Register `handler` for `kind`. Returns false if this build does not
    /// expose that callback.
    fn subscribe(&self, kind: WidgetEventKind, handler: WidgetEventHandler) -> bool;
}

/// The loaded widget toolkit.
#[async_trait]
pub trait WidgetToolkit: Send + Sync {
    async fn join_session(&self, config: &WidgetSessionConfig) -> Result<(), SdkError>;

    async fn leave_session(&self) -> Result<(), SdkError>;

    /// `None` when the build exposes no lifecycle callbacks at all.
    fn lifecycle_hooks(&self) -> Option<&dyn WidgetLifecycle>;
}

/// Answers whether the widget toolkit is available yet.
pub trait WidgetLocator: Send + Sync {
    fn locate(&self) -> Option<Arc<dyn WidgetToolkit>>;
}

/// Fixed behaviour of a [`WidgetSessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub readiness: ReadinessPolicy,
    pub init: InitConfig,
    pub role_type: u8,
    pub features: Vec<WidgetFeature>,
    pub auto_start_media: bool,
}

impl From<&SessionClientConfig> for WidgetSettings {
    fn from(config: &SessionClientConfig) -> Self {
        Self {
            readiness: config.widget_readiness_policy(),
            init: InitConfig {
                language: WIDGET_SDK_LANGUAGE.to_string(),
                stay_awake: true,
            },
            role_type: config.role_type,
            features: WidgetFeature::DEFAULT.to_vec(),
            auto_start_media: true,
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self::from(&SessionClientConfig::default())
    }
}

impl WidgetSettings {
    fn session_config(
        &self,
        room: &str,
        display_name: &str,
        passcode: Option<&str>,
        credential: SecretString,
    ) -> WidgetSessionConfig {
        let media = MediaAutoStart {
            auto_start: self.auto_start_media,
            mute: false,
        };
        WidgetSessionConfig {
            session_name: room.to_string(),
            session_passcode: passcode.unwrap_or_default().to_string(),
            user_name: display_name.to_string(),
            session_key: credential,
            user_identity: display_name.to_string(),
            features: self.features.clone(),
            init: self.init.clone(),
            audio: media,
            video: media,
        }
    }
}

struct WidgetInner {
    state: SessionState,
    generation: u64,
    toolkit: Option<Arc<dyn WidgetToolkit>>,
    pending: Option<CancellationToken>,
}

struct WidgetShared {
    inner: Mutex<WidgetInner>,
    view: Arc<dyn SessionView>,
    credentials: Arc<dyn CredentialSource>,
    locator: Arc<dyn WidgetLocator>,
    settings: WidgetSettings,
}

impl WidgetShared {
    fn lock(&self) -> MutexGuard<'_, WidgetInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset to `Idle` if `generation` is still current. Returns whether a
    /// reset happened.
    fn reset_if_current(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation
            || !matches!(inner.state, SessionState::Joined | SessionState::Leaving)
        {
            return false;
        }
        inner.generation += 1;
        inner.state = SessionState::Idle;
        inner.toolkit = None;
        inner.pending = None;
        self.view.show_join_form();
        true
    }

    fn handle_event(&self, generation: u64, event: WidgetEvent) {
        if self.lock().generation != generation {
            debug!(target: "session.widget", ?event, "Dropping widget event from a finished session");
            return;
        }
        match event {
            WidgetEvent::SessionJoined => {
                self.view
                    .show_status(StatusKind::Success, "Session fully started");
            }
            WidgetEvent::SessionLeft => {
                if self.reset_if_current(generation) {
                    info!(target: "session.widget", "Widget reported session left");
                    self.view.show_status(StatusKind::Info, "Left session");
                }
            }
            WidgetEvent::UserJoined { display_name } => {
                self.view
                    .show_status(StatusKind::Info, &format!("{display_name} joined"));
            }
            WidgetEvent::UserLeft { display_name } => {
                self.view
                    .show_status(StatusKind::Info, &format!("{display_name} left"));
            }
        }
    }
}

/// Controller that hands the session to the vendor widget.
#[derive(Clone)]
pub struct WidgetSessionController {
    shared: Arc<WidgetShared>,
}

impl WidgetSessionController {
    pub fn new(
        settings: WidgetSettings,
        credentials: Arc<dyn CredentialSource>,
        locator: Arc<dyn WidgetLocator>,
        view: Arc<dyn SessionView>,
    ) -> Self {
        Self {
            shared: Arc::new(WidgetShared {
                inner: Mutex::new(WidgetInner {
                    state: SessionState::Idle,
                    generation: 0,
                    toolkit: None,
                    pending: None,
                }),
                view,
                credentials,
                locator,
                settings,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Abort an in-flight join at its next suspension point.
    pub fn cancel_join(&self) -> bool {
        let inner = self.shared.lock();
        match (&inner.pending, inner.state.is_joining()) {
            (Some(token), true) => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Join a session through the widget.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`crate::SessionController::join`].
    #[instrument(skip_all, fields(room = %request.room.trim()))]
    pub async fn join(&self, request: JoinRequest) -> Result<(), SessionError> {
        let (room, display_name, passcode) = request.normalized();
        let view = Arc::clone(&self.shared.view);

        let cancel = {
            let mut inner = self.shared.lock();
            match inner.state {
                SessionState::Idle => {}
                SessionState::Joined => return Err(SessionError::AlreadyJoined),
                _ => return Err(SessionError::JoinInProgress),
            }
            if room.is_empty() || display_name.is_empty() {
                view.show_status(StatusKind::Error, &SessionError::InputValidation.to_string());
                return Err(SessionError::InputValidation);
            }
            inner.state = SessionState::AwaitingCredential;
            let cancel = CancellationToken::new();
            inner.pending = Some(cancel.clone());
            cancel
        };

        view.set_join_enabled(false);
        view.show_status(StatusKind::Info, "Joining session...");

        let outcome = match self
            .run_join(&room, &display_name, passcode.as_deref(), &cancel)
            .await
        {
            Ok(toolkit) => {
                self.enter_session(&room, toolkit);
                Ok(())
            }
            Err(err) => {
                {
                    let mut inner = self.shared.lock();
                    inner.state = SessionState::Idle;
                    inner.toolkit = None;
                    inner.pending = None;
                }
                warn!(target: "session.widget", error = %err, "Widget join failed");
                view.show_join_form();
                view.show_status(StatusKind::Error, &err.to_string());
                Err(err)
            }
        };

        view.set_join_enabled(true);
        outcome
    }

    async fn run_join(
        &self,
        room: &str,
        display_name: &str,
        passcode: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn WidgetToolkit>, SessionError> {
        let settings = &self.shared.settings;

        let request = TokenRequest::new(room, display_name, Some(settings.role_type));
        let credential = self.shared.credentials.request_credential(&request).await?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        self.set_state(SessionState::AwaitingSdkReady);
        let locator = Arc::clone(&self.shared.locator);
        let ready = readiness::wait_for(settings.readiness, cancel, || locator.locate())
            .await
            .map_err(|e| match e {
                ReadinessError::TimedOut { attempts } => SessionError::SdkLoadTimeout { attempts },
                ReadinessError::Cancelled => SessionError::Cancelled,
            })?;
        debug!(target: "session.widget", polls = ready.polls, "Widget toolkit available");
        let toolkit = ready.value;

        self.set_state(SessionState::Joining);
        let config = settings.session_config(room, display_name, passcode, credential);
        // The widget renders into the session container, so it must be
        // visible before joining.
        self.shared.view.show_in_session(room);
        toolkit
            .join_session(&config)
            .await
            .map_err(|e| SessionError::SdkJoin(e.0))?;
        if cancel.is_cancelled() {
            if let Err(e) = toolkit.leave_session().await {
                debug!(target: "session.widget", error = %e, "Ignoring leave failure after cancelled join");
            }
            return Err(SessionError::Cancelled);
        }

        Ok(toolkit)
    }

    fn set_state(&self, state: SessionState) {
        self.shared.lock().state = state;
    }

    fn enter_session(&self, room: &str, toolkit: Arc<dyn WidgetToolkit>) {
        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.state = SessionState::Joined;
            inner.toolkit = Some(Arc::clone(&toolkit));
            inner.pending = None;
            inner.generation
        };

        self.shared
            .view
            .show_status(StatusKind::Success, &format!("Joined session {room}"));
        info!(target: "session.widget", generation, "Joined session through widget");

        let Some(hooks) = toolkit.lifecycle_hooks() else {
            debug!(target: "session.widget", "Widget exposes no lifecycle callbacks");
            return;
        };
        for kind in WidgetEventKind::ALL {
            let shared = Arc::downgrade(&self.shared);
            let handler: WidgetEventHandler = Arc::new(move |event| {
                if let Some(shared) = shared.upgrade() {
                    shared.handle_event(generation, event);
                }
            });
            if !hooks.subscribe(kind, handler) {
                debug!(target: "session.widget", ?kind, "Widget does not expose callback");
            }
        }
    }

    /// Leave the widget session and reset immediately.
    ///
    /// # Errors
    ///
    /// `Leave` if the widget rejects `leave_session`; the controller has
    /// already been reset.
    #[instrument(skip_all)]
    pub async fn leave(&self) -> Result<(), SessionError> {
        let (toolkit, generation) = {
            let mut inner = self.shared.lock();
            match inner.state {
                SessionState::Idle | SessionState::Leaving => return Ok(()),
                SessionState::Joined => {}
                _ => return Err(SessionError::JoinInProgress),
            }
            inner.state = SessionState::Leaving;
            (inner.toolkit.clone(), inner.generation)
        };

        self.shared
            .view
            .show_status(StatusKind::Info, "Leaving session...");

        let result = match toolkit {
            Some(toolkit) => toolkit.leave_session().await,
            None => Ok(()),
        };

        // The widget's own session-left callback may already have reset us.
        let reset_here = self.shared.reset_if_current(generation);

        match result {
            Ok(()) => {
                if reset_here {
                    self.shared.view.show_status(StatusKind::Info, "Left session");
                }
                Ok(())
            }
            Err(e) => {
                warn!(target: "session.widget", error = %e, "Widget leave failed; state reset anyway");
                let err = SessionError::Leave(e.0);
                self.shared.view.show_status(StatusKind::Error, &err.to_string());
                Err(err)
            }
        }
    }
}

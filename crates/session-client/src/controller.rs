//! Session controller.
//!
//! Drives one participant through
//! `Idle -> AwaitingCredential -> AwaitingSdkReady -> Joining -> Joined -> Leaving -> Idle`.
//! A failed join attempt reports its error and lands back in `Idle`.
//!
//! State sits behind a `std::sync::Mutex` that is only ever held for a
//! single synchronous step, never across an `.await`. SDK event handlers
//! lock it, apply one keyed roster mutation, re-render, and release.
//!
//! Each successful join bumps a session generation. Handlers capture the
//! generation they were registered under and drop events once it has moved
//! on, so callbacks from a previous client cannot reach the next session.

use crate::config::SessionClientConfig;
use crate::credential_client::CredentialSource;
use crate::errors::{MediaKind, SdkError, SessionError};
use crate::readiness::{self, ReadinessError, ReadinessPolicy};
use crate::roster::{Roster, RosterView};
use crate::sdk::{
    Capability, EventHandler, InitConfig, MediaStream, SdkClient, SdkEvent, SdkEventKind,
    SdkLocator, VideoSdk,
};
use crate::view::{SessionView, StatusKind};
use common::secret::ExposeSecret;
use common::types::TokenRequest;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Lifecycle position of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingCredential,
    AwaitingSdkReady,
    Joining,
    Joined,
    Leaving,
}

impl SessionState {
    /// True between accepting a join request and reaching `Joined`.
    pub fn is_joining(self) -> bool {
        matches!(
            self,
            SessionState::AwaitingCredential | SessionState::AwaitingSdkReady | SessionState::Joining
        )
    }
}

/// User input for a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub room: String,
    pub display_name: String,
    pub passcode: Option<String>,
}

impl JoinRequest {
    pub fn new(room: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            display_name: display_name.into(),
            passcode: None,
        }
    }

    #[must_use]
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = Some(passcode.into());
        self
    }

    /// Trimmed room, display name and non-empty passcode.
    pub(crate) fn normalized(&self) -> (String, String, Option<String>) {
        (
            self.room.trim().to_string(),
            self.display_name.trim().to_string(),
            self.passcode
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        )
    }
}

/// Local capture flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaState {
    pub video_on: bool,
    pub audio_on: bool,
}

impl MediaState {
    fn is_on(self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Video => self.video_on,
            MediaKind::Audio => self.audio_on,
        }
    }

    fn set(&mut self, kind: MediaKind, on: bool) {
        match kind {
            MediaKind::Video => self.video_on = on,
            MediaKind::Audio => self.audio_on = on,
        }
    }
}

/// Fixed behaviour of a [`SessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub readiness: ReadinessPolicy,
    pub init: InitConfig,
    pub role_type: u8,
    pub auto_start_media: bool,
}

impl From<&SessionClientConfig> for ControllerSettings {
    fn from(config: &SessionClientConfig) -> Self {
        Self {
            readiness: config.readiness_policy(),
            init: InitConfig {
                language: config.sdk_language.clone(),
                stay_awake: true,
            },
            role_type: config.role_type,
            auto_start_media: config.auto_start_media,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&SessionClientConfig::default())
    }
}

struct Inner {
    state: SessionState,
    generation: u64,
    room: Option<String>,
    client: Option<Arc<dyn SdkClient>>,
    stream: Option<Arc<dyn MediaStream>>,
    roster: Roster,
    media: MediaState,
    /// Capture streams with a start/stop call outstanding.
    media_in_flight: HashSet<MediaKind>,
    pending: Option<CancellationToken>,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            room: None,
            client: None,
            stream: None,
            roster: Roster::new(),
            media: MediaState::default(),
            media_in_flight: HashSet::new(),
            pending: None,
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    view: Arc<dyn SessionView>,
    credentials: Arc<dyn CredentialSource>,
    locator: Arc<dyn SdkLocator>,
    settings: ControllerSettings,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        self.lock().state = state;
    }

    fn handle_event(&self, generation: u64, event: SdkEvent) {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state != SessionState::Joined {
            debug!(
                target: "session.controller",
                kind = event.kind().as_str(),
                "Dropping event from a finished session"
            );
            return;
        }
        inner.roster.apply(&event);
        self.view.render_roster(&inner.roster.view());
    }
}

/// Marks one capture stream busy for the lifetime of a start/stop call.
struct MediaCallGuard<'a> {
    shared: &'a Shared,
    kind: MediaKind,
    generation: u64,
}

impl Drop for MediaCallGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        if inner.generation == self.generation {
            inner.media_in_flight.remove(&self.kind);
        }
    }
}

/// Controller for a roster-mirroring session.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    shared: Arc<Shared>,
}

impl SessionController {
    pub fn new(
        settings: ControllerSettings,
        credentials: Arc<dyn CredentialSource>,
        locator: Arc<dyn SdkLocator>,
        view: Arc<dyn SessionView>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::new()),
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

    pub fn media_state(&self) -> MediaState {
        self.shared.lock().media
    }

    pub fn roster_view(&self) -> RosterView {
        self.shared.lock().roster.view()
    }

    pub fn room(&self) -> Option<String> {
        self.shared.lock().room.clone()
    }

    /// Generation of the current (or last) session.
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    /// Abort an in-flight join at its next suspension point.
    ///
    /// Returns false when no join is in flight.
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

    /// Join a session.
    ///
    /// # Errors
    ///
    /// - `AlreadyJoined` / `JoinInProgress` when not `Idle`
    /// - `InputValidation` when room or display name is blank
    /// - `CredentialRequest`, `SdkLoadTimeout`, `SdkCapability`, `SdkJoin`
    ///   or `Cancelled` from the attempt itself; the controller is back in
    ///   `Idle` with the join form restored
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
            Ok(client) => {
                self.enter_session(&room, client).await;
                Ok(())
            }
            Err(err) => {
                self.abort_join(&err);
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
    ) -> Result<Arc<dyn SdkClient>, SessionError> {
        let settings = &self.shared.settings;

        let request = TokenRequest::new(room, display_name, Some(settings.role_type));
        let credential = self.shared.credentials.request_credential(&request).await?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        debug!(target: "session.controller", "Credential received");

        self.shared.set_state(SessionState::AwaitingSdkReady);
        let locator = Arc::clone(&self.shared.locator);
        let ready = readiness::wait_for(settings.readiness, cancel, || locator.locate())
            .await
            .map_err(|e| match e {
                ReadinessError::TimedOut { attempts } => SessionError::SdkLoadTimeout { attempts },
                ReadinessError::Cancelled => SessionError::Cancelled,
            })?;
        debug!(target: "session.controller", polls = ready.polls, "SDK available");

        let sdk = ready.value;
        check_capabilities(sdk.as_ref())?;

        self.shared.set_state(SessionState::Joining);
        let client = sdk.create_client().map_err(join_error)?;
        client.init(&settings.init).await.map_err(join_error)?;
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        client
            .join(room, credential.expose_secret(), display_name, passcode)
            .await
            .map_err(join_error)?;
        if cancel.is_cancelled() {
            // The SDK joined before the cancel could take effect.
            if let Err(e) = client.leave().await {
                debug!(target: "session.controller", error = %e, "Ignoring leave failure after cancelled join");
            }
            return Err(SessionError::Cancelled);
        }

        Ok(client)
    }

    /// Transition to `Joined`: store the client, subscribe, seed the roster
    /// with the local participant and optionally start capture.
    async fn enter_session(&self, room: &str, client: Arc<dyn SdkClient>) {
        let stream = client.media_stream();
        let me = client.current_user_info();
        if me.is_none() {
            warn!(target: "session.controller", "SDK did not report the local participant");
        }

        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            inner.state = SessionState::Joined;
            inner.room = Some(room.to_string());
            inner.client = Some(Arc::clone(&client));
            inner.stream = stream;
            inner.media = MediaState::default();
            inner.pending = None;
            inner.roster.clear();
            if let Some(me) = &me {
                inner.roster.insert_self(me);
            }
            inner.generation
        };

        for kind in SdkEventKind::ALL {
            let shared = Arc::downgrade(&self.shared);
            let handler: EventHandler = Arc::new(move |event| {
                if let Some(shared) = shared.upgrade() {
                    shared.handle_event(generation, event);
                }
            });
            client.on(kind, handler);
        }

        {
            let inner = self.shared.lock();
            let view = &self.shared.view;
            view.show_in_session(room);
            view.render_roster(&inner.roster.view());
            view.set_media_state(false, false);
        }
        self.shared
            .view
            .show_status(StatusKind::Success, &format!("Joined session {room}"));
        info!(target: "session.controller", generation, "Joined session");

        if self.shared.settings.auto_start_media {
            for kind in [MediaKind::Audio, MediaKind::Video] {
                if let Err(err) = self.set_media(kind, true).await {
                    warn!(target: "session.controller", error = %err, "Capture start failed after join");
                    self.shared
                        .view
                        .show_status(StatusKind::Warning, &err.to_string());
                }
            }
        }
    }

    fn abort_join(&self, err: &SessionError) {
        {
            let mut inner = self.shared.lock();
            inner.state = SessionState::Idle;
            inner.client = None;
            inner.stream = None;
            inner.pending = None;
        }
        warn!(target: "session.controller", error = %err, "Join failed");
        self.shared.view.show_join_form();
        self.shared.view.show_status(StatusKind::Error, &err.to_string());
    }

    /// Flip local video. No-op unless joined.
    ///
    /// # Errors
    ///
    /// `MediaToggle` if the SDK rejects the start/stop; the flag is unchanged.
    pub async fn toggle_video(&self) -> Result<(), SessionError> {
        self.toggle(MediaKind::Video).await
    }

    /// Flip local audio. No-op unless joined.
    ///
    /// # Errors
    ///
    /// `MediaToggle` if the SDK rejects the start/stop; the flag is unchanged.
    pub async fn toggle_audio(&self) -> Result<(), SessionError> {
        self.toggle(MediaKind::Audio).await
    }

    #[instrument(skip(self))]
    async fn toggle(&self, kind: MediaKind) -> Result<(), SessionError> {
        let target = {
            let inner = self.shared.lock();
            if inner.state != SessionState::Joined {
                return Ok(());
            }
            !inner.media.is_on(kind)
        };

        self.set_media(kind, target).await.inspect_err(|err| {
            warn!(target: "session.controller", error = %err, "Media toggle failed");
            self.shared.view.show_status(StatusKind::Error, &err.to_string());
        })
    }

    /// Start or stop one capture stream and record the result.
    ///
    /// A call for a stream that already has one outstanding is dropped.
    async fn set_media(&self, kind: MediaKind, on: bool) -> Result<(), SessionError> {
        let (stream, generation, self_id) = {
            let mut inner = self.shared.lock();
            if inner.state != SessionState::Joined {
                return Ok(());
            }
            if !inner.media_in_flight.insert(kind) {
                debug!(target: "session.controller", %kind, "Media call already in flight");
                return Ok(());
            }
            (inner.stream.clone(), inner.generation, inner.roster.self_id())
        };
        let _busy = MediaCallGuard {
            shared: &self.shared,
            kind,
            generation,
        };

        let stream = stream.ok_or_else(|| SessionError::MediaToggle {
            kind,
            reason: "media stream unavailable".to_string(),
        })?;

        let result = match (kind, on) {
            (MediaKind::Video, true) => stream.start_video().await,
            (MediaKind::Video, false) => stream.stop_video().await,
            (MediaKind::Audio, true) => stream.start_audio().await,
            (MediaKind::Audio, false) => stream.stop_audio().await,
        };
        result.map_err(|e| SessionError::MediaToggle { kind, reason: e.0 })?;

        if kind == MediaKind::Video && on {
            if let Some(self_id) = self_id {
                if let Err(e) = stream.attach_video(self_id).await {
                    warn!(target: "session.controller", error = %e, "Failed to attach self video");
                }
            }
        }

        let mut inner = self.shared.lock();
        if inner.generation != generation || inner.state != SessionState::Joined {
            // Session ended while the call was in flight.
            return Ok(());
        }
        inner.media.set(kind, on);
        inner.roster.set_self_media(kind, on);
        let view = &self.shared.view;
        view.render_roster(&inner.roster.view());
        view.set_media_state(inner.media.video_on, inner.media.audio_on);
        debug!(target: "session.controller", %kind, on, "Local media updated");
        Ok(())
    }

    /// Leave the current session.
    ///
    /// No-op when `Idle`. Rejected with `JoinInProgress` while a join is in
    /// flight; use [`SessionController::cancel_join`] for that.
    ///
    /// # Errors
    ///
    /// `Leave` if the SDK rejects `leave`. The controller is reset to `Idle`
    /// before the error is returned.
    #[instrument(skip_all)]
    pub async fn leave(&self) -> Result<(), SessionError> {
        let (client, stream, media) = {
            let mut inner = self.shared.lock();
            match inner.state {
                SessionState::Idle | SessionState::Leaving => return Ok(()),
                SessionState::Joined => {}
                _ => return Err(SessionError::JoinInProgress),
            }
            inner.state = SessionState::Leaving;
            (inner.client.clone(), inner.stream.clone(), inner.media)
        };

        self.shared
            .view
            .show_status(StatusKind::Info, "Leaving session...");

        if let Some(stream) = stream {
            if media.video_on {
                if let Err(e) = stream.stop_video().await {
                    debug!(target: "session.controller", error = %e, "Ignoring video stop failure on leave");
                }
            }
            if media.audio_on {
                if let Err(e) = stream.stop_audio().await {
                    debug!(target: "session.controller", error = %e, "Ignoring audio stop failure on leave");
                }
            }
        }

        let result = match client {
            Some(client) => client.leave().await,
            None => Ok(()),
        };

        self.reset();

        match result {
            Ok(()) => {
                info!(target: "session.controller", "Left session");
                self.shared.view.show_status(StatusKind::Info, "Left session");
                Ok(())
            }
            Err(e) => {
                warn!(target: "session.controller", error = %e, "Leave failed; state reset anyway");
                let err = SessionError::Leave(e.0);
                self.shared.view.show_status(StatusKind::Error, &err.to_string());
                Err(err)
            }
        }
    }

    /// Drop everything tied to the session and restore the join form.
    fn reset(&self) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.state = SessionState::Idle;
        inner.room = None;
        inner.client = None;
        inner.stream = None;
        inner.media = MediaState::default();
        inner.media_in_flight.clear();
        inner.pending = None;
        inner.roster.clear();

        let view = &self.shared.view;
        view.render_roster(&inner.roster.view());
        view.set_media_state(false, false);
        view.show_join_form();
    }
}

fn join_error(e: SdkError) -> SessionError {
    SessionError::SdkJoin(e.0)
}

fn check_capabilities(sdk: &dyn VideoSdk) -> Result<(), SessionError> {
    let missing = sdk.capabilities().missing(&Capability::REQUIRED);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
    warn!(target: "session.controller", missing = ?names, "SDK lacks required capabilities");
    Err(SessionError::SdkCapability(names.join(", ")))
}

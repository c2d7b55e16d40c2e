//! Capability contract for the hosted video SDK.
//!
//! The vendor SDK is loaded outside this crate. The controller only sees it
//! through these traits: a [`SdkLocator`] answers "is it there yet", a
//! [`VideoSdk`] reports what it supports and hands out clients, and each
//! [`SdkClient`] drives one session.

use crate::errors::SdkError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Participant identifier assigned by the SDK.
pub type ParticipantId = u64;

/// Operations the controller calls on the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    CreateClient,
    Init,
    Join,
    Leave,
    MediaStream,
    Events,
    CurrentUserInfo,
}

impl Capability {
    /// Everything [`crate::SessionController`] needs.
    pub const REQUIRED: [Capability; 7] = [
        Capability::CreateClient,
        Capability::Init,
        Capability::Join,
        Capability::Leave,
        Capability::MediaStream,
        Capability::Events,
        Capability::CurrentUserInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::CreateClient => "createClient",
            Capability::Init => "init",
            Capability::Join => "join",
            Capability::Leave => "leave",
            Capability::MediaStream => "getMediaStream",
            Capability::Events => "on",
            Capability::CurrentUserInfo => "getCurrentUserInfo",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities an SDK build exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// A set containing every capability in [`Capability::REQUIRED`].
    pub fn full() -> Self {
        Self(Capability::REQUIRED.into_iter().collect())
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.0.remove(&capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Entries of `required` absent from this set, in order.
    pub fn missing(&self, required: &[Capability]) -> Vec<Capability> {
        required
            .iter()
            .copied()
            .filter(|c| !self.0.contains(c))
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Fixed configuration handed to `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    pub language: String,
    /// Ask the platform to keep the device awake while in session.
    pub stay_awake: bool,
}

/// The local participant as reported by the SDK after joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: ParticipantId,
    pub display_name: String,
}

/// The four event categories the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkEventKind {
    ParticipantAdded,
    ParticipantRemoved,
    PeerVideoStateChanged,
    AudioStateChanged,
}

impl SdkEventKind {
    pub const ALL: [SdkEventKind; 4] = [
        SdkEventKind::ParticipantAdded,
        SdkEventKind::ParticipantRemoved,
        SdkEventKind::PeerVideoStateChanged,
        SdkEventKind::AudioStateChanged,
    ];

    /// Vendor event name.
    pub fn as_str(self) -> &'static str {
        match self {
            SdkEventKind::ParticipantAdded => "user-added",
            SdkEventKind::ParticipantRemoved => "user-removed",
            SdkEventKind::PeerVideoStateChanged => "peer-video-state-change",
            SdkEventKind::AudioStateChanged => "current-audio-change",
        }
    }
}

/// A roster or media event emitted by the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkEvent {
    ParticipantAdded {
        user_id: ParticipantId,
        display_name: String,
        video_on: bool,
        audio_on: bool,
    },
    ParticipantRemoved {
        user_id: ParticipantId,
    },
    PeerVideoStateChanged {
        user_id: ParticipantId,
        video_on: bool,
    },
    AudioStateChanged {
        user_id: ParticipantId,
        audio_on: bool,
    },
}

impl SdkEvent {
    pub fn kind(&self) -> SdkEventKind {
        match self {
            SdkEvent::ParticipantAdded { .. } => SdkEventKind::ParticipantAdded,
            SdkEvent::ParticipantRemoved { .. } => SdkEventKind::ParticipantRemoved,
            SdkEvent::PeerVideoStateChanged { .. } => SdkEventKind::PeerVideoStateChanged,
            SdkEvent::AudioStateChanged { .. } => SdkEventKind::AudioStateChanged,
        }
    }

    pub fn user_id(&self) -> ParticipantId {
        match self {
            SdkEvent::ParticipantAdded { user_id, .. }
            | SdkEvent::ParticipantRemoved { user_id }
            | SdkEvent::PeerVideoStateChanged { user_id, .. }
            | SdkEvent::AudioStateChanged { user_id, .. } => *user_id,
        }
    }
}

/// Synchronous event callback. Must not block.
pub type EventHandler = Arc<dyn Fn(SdkEvent) + Send + Sync>;

/// Answers whether the externally loaded SDK is available yet.
pub trait SdkLocator: Send + Sync {
    fn locate(&self) -> Option<Arc<dyn VideoSdk>>;
}

/// Entry point of a loaded SDK.
pub trait VideoSdk: Send + Sync {
    fn capabilities(&self) -> CapabilitySet;

    fn create_client(&self) -> Result<Arc<dyn SdkClient>, SdkError>;
}

/// One SDK client, used for a single session.
#[async_trait]
pub trait SdkClient: Send + Sync {
    async fn init(&self, config: &InitConfig) -> Result<(), SdkError>;

    async fn join(
        &self,
        room: &str,
        credential: &str,
        display_name: &str,
        passcode: Option<&str>,
    ) -> Result<(), SdkError>;

    async fn leave(&self) -> Result<(), SdkError>;

    /// Local capture handle; `None` until joined.
    fn media_stream(&self) -> Option<Arc<dyn MediaStream>>;

    fn on(&self, kind: SdkEventKind, handler: EventHandler);

    fn current_user_info(&self) -> Option<UserInfo>;
}

/// Local audio/video capture.
#[async_trait]
pub trait MediaStream: Send + Sync {
    async fn start_video(&self) -> Result<(), SdkError>;

    async fn stop_video(&self) -> Result<(), SdkError>;

    async fn start_audio(&self) -> Result<(), SdkError>;

    async fn stop_audio(&self) -> Result<(), SdkError>;

    /// Bind a participant's video to the rendering surface.
    async fn attach_video(&self, user_id: ParticipantId) -> Result<(), SdkError>;
}

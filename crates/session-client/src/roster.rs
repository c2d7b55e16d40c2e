//! Local mirror of the session's participants.
//!
//! Each SDK event maps to exactly one keyed mutation. The mutations are
//! idempotent per key, so events may arrive in any order or be replayed.
//! Media events that target the local participant are ignored: the self
//! entry only changes through [`Roster::set_self_media`], after the local
//! start/stop call has succeeded.

use crate::errors::MediaKind;
use crate::sdk::{ParticipantId, SdkEvent, UserInfo};
use std::collections::HashMap;

/// One participant as rendered in the participant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub is_self: bool,
    pub video_on: bool,
    pub audio_on: bool,
}

/// Keyed participant collection.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    self_id: Option<ParticipantId>,
    entries: HashMap<ParticipantId, RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the local participant with both media flags off.
    pub fn insert_self(&mut self, info: &UserInfo) {
        self.self_id = Some(info.user_id);
        self.entries.insert(
            info.user_id,
            RosterEntry {
                participant_id: info.user_id,
                display_name: info.display_name.clone(),
                is_self: true,
                video_on: false,
                audio_on: false,
            },
        );
    }

    pub fn self_id(&self) -> Option<ParticipantId> {
        self.self_id
    }

    /// Apply one SDK event. Returns whether the roster changed.
    pub fn apply(&mut self, event: &SdkEvent) -> bool {
        match event {
            SdkEvent::ParticipantAdded {
                user_id,
                display_name,
                video_on,
                audio_on,
            } => {
                if Some(*user_id) == self.self_id {
                    // The SDK echoes the local join; only the name is taken.
                    return match self.entries.get_mut(user_id) {
                        Some(entry) if entry.display_name != *display_name => {
                            entry.display_name.clone_from(display_name);
                            true
                        }
                        _ => false,
                    };
                }
                let entry = RosterEntry {
                    participant_id: *user_id,
                    display_name: display_name.clone(),
                    is_self: false,
                    video_on: *video_on,
                    audio_on: *audio_on,
                };
                self.entries.insert(*user_id, entry.clone()) != Some(entry)
            }
            SdkEvent::ParticipantRemoved { user_id } => self.entries.remove(user_id).is_some(),
            SdkEvent::PeerVideoStateChanged { user_id, video_on } => {
                self.update_remote(*user_id, |entry| &mut entry.video_on, *video_on)
            }
            SdkEvent::AudioStateChanged { user_id, audio_on } => {
                self.update_remote(*user_id, |entry| &mut entry.audio_on, *audio_on)
            }
        }
    }

    fn update_remote(
        &mut self,
        user_id: ParticipantId,
        field: impl FnOnce(&mut RosterEntry) -> &mut bool,
        value: bool,
    ) -> bool {
        if Some(user_id) == self.self_id {
            return false;
        }
        match self.entries.get_mut(&user_id) {
            Some(entry) => {
                let flag = field(entry);
                let changed = *flag != value;
                *flag = value;
                changed
            }
            None => false,
        }
    }

    /// Record a successful local start/stop on the self entry.
    pub fn set_self_media(&mut self, kind: MediaKind, on: bool) {
        let Some(entry) = self.self_id.and_then(|id| self.entries.get_mut(&id)) else {
            return;
        };
        match kind {
            MediaKind::Video => entry.video_on = on,
            MediaKind::Audio => entry.audio_on = on,
        }
    }

    pub fn get(&self, participant_id: ParticipantId) -> Option<&RosterEntry> {
        self.entries.get(&participant_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.self_id = None;
        self.entries.clear();
    }

    /// Recompute the rendered view from scratch.
    pub fn view(&self) -> RosterView {
        let mut participants: Vec<RosterEntry> = self.entries.values().cloned().collect();
        participants.sort_by(|a, b| {
            b.is_self
                .cmp(&a.is_self)
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.participant_id.cmp(&b.participant_id))
        });
        RosterView { participants }
    }
}

/// Participant list in render order: self first, then by name, then by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub participants: Vec<RosterEntry>,
}

impl RosterView {
    pub fn count(&self) -> usize {
        self.participants.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.participants
            .iter()
            .map(|p| p.display_name.as_str())
            .collect()
    }
}

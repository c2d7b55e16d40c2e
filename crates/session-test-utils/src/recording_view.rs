//! View that records every call for assertions.

use session_client::{RosterView, SessionView, StatusKind};
use std::sync::Mutex;

/// One recorded UI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Status(StatusKind, String),
    Roster(RosterView),
    JoinForm,
    InSession(String),
    JoinEnabled(bool),
    Media { video_on: bool, audio_on: bool },
}

#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Status messages in order.
    pub fn statuses(&self) -> Vec<(StatusKind, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Status(kind, message) => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<(StatusKind, String)> {
        self.statuses().pop()
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses().iter().any(|(k, _)| *k == kind)
    }

    pub fn last_roster(&self) -> Option<RosterView> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ViewCall::Roster(view) => Some(view),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &ViewCall) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SessionView for RecordingView {
    fn show_status(&self, kind: StatusKind, message: &str) {
        self.push(ViewCall::Status(kind, message.to_string()));
    }

    fn render_roster(&self, view: &RosterView) {
        self.push(ViewCall::Roster(view.clone()));
    }

    fn show_join_form(&self) {
        self.push(ViewCall::JoinForm);
    }

    fn show_in_session(&self, room: &str) {
        self.push(ViewCall::InSession(room.to_string()));
    }

    fn set_join_enabled(&self, enabled: bool) {
        self.push(ViewCall::JoinEnabled(enabled));
    }

    fn set_media_state(&self, video_on: bool, audio_on: bool) {
        self.push(ViewCall::Media { video_on, audio_on });
    }
}

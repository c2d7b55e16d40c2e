//! Rendering seam between the controllers and whatever draws the UI.

use crate::roster::RosterView;

/// Prefix for the pre-filled display name of the roster client.
pub const DEFAULT_NAME_PREFIX: &str = "User";

/// Prefix for the pre-filled display name of the widget client.
pub const WIDGET_NAME_PREFIX: &str = "UIKit_User";

/// Severity of a status banner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    /// Non-fatal problem; the session continues.
    Warning,
    Error,
}

/// Everything the controllers ask of the UI.
///
/// Calls are synchronous and may be made while controller state is locked,
/// so implementations must not call back into the controller.
pub trait SessionView: Send + Sync {
    fn show_status(&self, kind: StatusKind, message: &str);

    /// Replace the participant list with `view`.
    fn render_roster(&self, view: &RosterView);

    /// Restore the pre-join form.
    fn show_join_form(&self);

    fn show_in_session(&self, room: &str);

    fn set_join_enabled(&self, enabled: bool);

    /// Reflect local capture state on the toggle controls.
    fn set_media_state(&self, video_on: bool, audio_on: bool);
}

/// Display name used to pre-fill the join form, e.g. `User_42`.
///
/// `seed` is reduced to three digits.
pub fn default_display_name(prefix: &str, seed: u32) -> String {
    format!("{}_{}", prefix, seed % 1000)
}

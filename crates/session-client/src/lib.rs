//! Session Client Library
//!
//! Client-side controller for joining rooms on the hosted video SDK.
//!
//! A join request flows through:
//!
//! ```text
//! CredentialSource (POST /api/token) -> readiness::wait_for(SdkLocator)
//!     -> SdkClient::init/join -> roster mirror -> SessionView
//! ```
//!
//! The vendor SDK, its widget toolkit and the UI are all injected through
//! traits, so the same controller runs against fakes in tests.
//!
//! # Modules
//!
//! - `config` - Client configuration from environment
//! - `controller` - Roster-mirroring session controller
//! - `credential_client` - HTTP client for the credential issuer
//! - `errors` - Session error taxonomy
//! - `readiness` - Bounded, cancellable readiness wait
//! - `roster` - Participant mirror and derived view
//! - `sdk` - SDK capability traits and event types
//! - `view` - UI seam
//! - `widget` - Widget-delegating session controller

pub mod config;
pub mod controller;
pub mod credential_client;
pub mod errors;
pub mod readiness;
pub mod roster;
pub mod sdk;
pub mod view;
pub mod widget;

pub use config::SessionClientConfig;
pub use controller::{ControllerSettings, JoinRequest, MediaState, SessionController, SessionState};
pub use credential_client::{CredentialSource, HttpCredentialClient};
pub use errors::{MediaKind, SdkError, SessionError};
pub use roster::{Roster, RosterEntry, RosterView};
pub use view::{SessionView, StatusKind};
pub use widget::{WidgetSessionController, WidgetSettings};

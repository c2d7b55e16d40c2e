//! # Session Test Utilities
//!
//! Fakes for driving the session controllers without a real SDK, widget,
//! issuer or UI.
//!
//! This crate provides:
//! - `FakeSdk` / `FakeSdkClient` / `FakeMediaStream` with scriptable failures
//!   and event emission
//! - `FakeLocator` for both the SDK and the widget toolkit
//! - `FakeWidgetToolkit` with optional lifecycle callbacks
//! - `FakeCredentialSource`
//! - `RecordingView`, which records every UI call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use session_test_utils::*;
//!
//! let sdk = FakeSdk::new();
//! let view = Arc::new(RecordingView::new());
//! let controller = SessionController::new(
//!     ControllerSettings::default(),
//!     Arc::new(FakeCredentialSource::issuing("tok")),
//!     Arc::new(FakeLocator::present(sdk.handle())),
//!     view.clone(),
//! );
//! controller.join(JoinRequest::new("room1", "alice")).await?;
//! sdk.last_client().emit(SdkEvent::ParticipantRemoved { user_id: 2 });
//! ```

pub mod fake_credentials;
pub mod fake_locator;
pub mod fake_sdk;
pub mod fake_widget;
pub mod recording_view;

pub use fake_credentials::FakeCredentialSource;
pub use fake_locator::FakeLocator;
pub use fake_sdk::{
    ClientBehavior, FakeMediaStream, FakeSdk, FakeSdkClient, MediaOp, SdkCall, FAKE_SELF_ID,
};
pub use fake_widget::{FakeWidgetHooks, FakeWidgetToolkit};
pub use recording_view::{RecordingView, ViewCall};

//! Session controller integration tests.
//!
//! Drives `SessionController` against the fakes in `session-test-utils`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use session_client::sdk::{Capability, CapabilitySet, SdkEvent, SdkEventKind, VideoSdk};
use session_client::{
    ControllerSettings, JoinRequest, MediaState, SessionController, SessionError, SessionState,
    StatusKind,
};
use session_test_utils::{
    ClientBehavior, FakeCredentialSource, FakeLocator, FakeSdk, MediaOp, RecordingView, SdkCall,
    ViewCall, FAKE_SELF_ID,
};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    controller: SessionController,
    sdk: FakeSdk,
    credentials: Arc<FakeCredentialSource>,
    locator: Arc<FakeLocator<Arc<dyn VideoSdk>>>,
    view: Arc<RecordingView>,
}

impl Harness {
    fn new() -> Self {
        Self::build(
            ControllerSettings::default(),
            FakeCredentialSource::issuing("tok"),
            FakeSdk::new(),
            Some(0),
        )
    }

    fn with_sdk(sdk: FakeSdk) -> Self {
        Self::build(
            ControllerSettings::default(),
            FakeCredentialSource::issuing("tok"),
            sdk,
            Some(0),
        )
    }

    fn build(
        settings: ControllerSettings,
        credentials: FakeCredentialSource,
        sdk: FakeSdk,
        available_after: Option<u32>,
    ) -> Self {
        let credentials = Arc::new(credentials);
        let locator = Arc::new(match available_after {
            Some(checks) => FakeLocator::available_after(sdk.handle(), checks),
            None => FakeLocator::never(sdk.handle()),
        });
        let view = Arc::new(RecordingView::new());
        let controller = SessionController::new(
            settings,
            credentials.clone(),
            locator.clone(),
            view.clone(),
        );
        Self {
            controller,
            sdk,
            credentials,
            locator,
            view,
        }
    }

    async fn joined() -> Self {
        let harness = Self::new();
        harness
            .controller
            .join(JoinRequest::new("room1", "alice"))
            .await
            .expect("join should succeed");
        harness
    }

    fn emit(&self, event: SdkEvent) {
        self.sdk.last_client().emit(event);
    }
}

fn added(user_id: u64, name: &str) -> SdkEvent {
    SdkEvent::ParticipantAdded {
        user_id,
        display_name: name.to_string(),
        video_on: false,
        audio_on: false,
    }
}

// =============================================================================
// Join
// =============================================================================

#[tokio::test]
async fn test_join_success_reaches_joined() {
    let h = Harness::new();

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(h.controller.state(), SessionState::Joined);
    assert_eq!(h.controller.room().as_deref(), Some("room1"));

    let request = h.credentials.last_request().unwrap();
    assert_eq!(request.session_name.as_deref(), Some("room1"));
    assert_eq!(request.user_identity.as_deref(), Some("alice"));
    assert_eq!(request.role_type, Some(1));

    let calls = h.sdk.last_client().calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], SdkCall::Init(init) if init.language == "ja-JP" && init.stay_awake));
    assert_eq!(
        calls[1],
        SdkCall::Join {
            room: "room1".to_string(),
            credential: "tok".to_string(),
            display_name: "alice".to_string(),
            passcode: None,
        }
    );

    let roster = h.controller.roster_view();
    assert_eq!(roster.count(), 1);
    assert!(roster.participants[0].is_self);
    assert_eq!(roster.participants[0].participant_id, FAKE_SELF_ID);

    for kind in SdkEventKind::ALL {
        assert_eq!(h.sdk.last_client().handler_count(kind), 1);
    }
}

#[tokio::test]
async fn test_sdk_present_from_start_needs_zero_polls() {
    let h = Harness::new();

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(h.locator.checks(), 1);
}

#[tokio::test]
async fn test_join_updates_view() {
    let h = Harness::joined().await;
    let calls = h.view.calls();

    assert_eq!(calls.first(), Some(&ViewCall::JoinEnabled(false)));
    assert_eq!(calls.last(), Some(&ViewCall::JoinEnabled(true)));
    assert_eq!(h.view.count(&ViewCall::InSession("room1".to_string())), 1);
    assert_eq!(
        h.view.last_status(),
        Some((StatusKind::Success, "Joined session room1".to_string()))
    );
}

#[tokio::test]
async fn test_join_trims_input_and_passes_passcode() {
    let h = Harness::new();

    h.controller
        .join(JoinRequest::new("  room1 ", " alice ").with_passcode(" 9876 "))
        .await
        .unwrap();

    assert_eq!(
        h.sdk.last_client().calls()[1],
        SdkCall::Join {
            room: "room1".to_string(),
            credential: "tok".to_string(),
            display_name: "alice".to_string(),
            passcode: Some("9876".to_string()),
        }
    );
}

#[tokio::test]
async fn test_blank_input_is_rejected_without_network_call() {
    let h = Harness::new();

    for request in [
        JoinRequest::new("", "alice"),
        JoinRequest::new("room1", "   "),
    ] {
        let result = h.controller.join(request).await;
        assert_eq!(result, Err(SessionError::InputValidation));
    }

    assert_eq!(h.credentials.call_count(), 0);
    assert_eq!(h.locator.checks(), 0);
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.view.has_status(StatusKind::Error));
}

#[tokio::test]
async fn test_credential_failure_aborts_join() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::failing("Token generation failed"),
        FakeSdk::new(),
        Some(0),
    );

    let result = h.controller.join(JoinRequest::new("room1", "alice")).await;

    assert_eq!(
        result,
        Err(SessionError::CredentialRequest(
            "Token generation failed".to_string()
        ))
    );
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.sdk.clients().is_empty());
    assert_eq!(h.view.count(&ViewCall::JoinForm), 1);
    assert_eq!(h.view.calls().last(), Some(&ViewCall::JoinEnabled(true)));
}

#[tokio::test(start_paused = true)]
async fn test_sdk_loading_late_is_awaited() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::issuing("tok"),
        FakeSdk::new(),
        Some(5),
    );

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(h.controller.state(), SessionState::Joined);
    assert_eq!(h.locator.checks(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_sdk_never_loading_times_out_within_bound() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::issuing("tok"),
        FakeSdk::new(),
        None,
    );
    let start = tokio::time::Instant::now();

    let result = h.controller.join(JoinRequest::new("room1", "alice")).await;

    assert_eq!(result, Err(SessionError::SdkLoadTimeout { attempts: 100 }));
    assert_eq!(h.locator.checks(), 101);
    assert!(start.elapsed() >= Duration::from_secs(10));
    assert!(start.elapsed() < Duration::from_secs(11));
    assert_eq!(h.controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_missing_capability_is_reported_before_creating_client() {
    let sdk = FakeSdk::new().with_capabilities(CapabilitySet::full().without(Capability::MediaStream));
    let h = Harness::with_sdk(sdk);

    let result = h.controller.join(JoinRequest::new("room1", "alice")).await;

    assert_eq!(
        result,
        Err(SessionError::SdkCapability("getMediaStream".to_string()))
    );
    assert!(h.sdk.clients().is_empty());
    assert_eq!(h.controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_init_rejection_reverts_to_join_form() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        init_error: Some("unsupported browser".to_string()),
        ..ClientBehavior::default()
    }));

    let result = h.controller.join(JoinRequest::new("room1", "alice")).await;

    assert_eq!(
        result,
        Err(SessionError::SdkJoin("unsupported browser".to_string()))
    );
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.view.count(&ViewCall::JoinForm), 1);
    assert_eq!(
        h.view.last_status(),
        Some((
            StatusKind::Error,
            "Failed to join session: unsupported browser".to_string()
        ))
    );
}

#[tokio::test]
async fn test_join_rejection_carries_sdk_message() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        join_error: Some("invalid signature".to_string()),
        ..ClientBehavior::default()
    }));

    let result = h.controller.join(JoinRequest::new("room1", "alice")).await;

    assert_eq!(
        result,
        Err(SessionError::SdkJoin("invalid signature".to_string()))
    );
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.controller.roster_view().participants.is_empty());
}

#[tokio::test]
async fn test_failed_join_can_be_retried() {
    let h = Harness::new();
    let bad = h.controller.join(JoinRequest::new("", "alice")).await;
    assert!(bad.is_err());

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();
    assert_eq!(h.controller.state(), SessionState::Joined);
}

#[tokio::test]
async fn test_second_join_is_rejected_when_joined() {
    let h = Harness::joined().await;

    let result = h.controller.join(JoinRequest::new("room2", "alice")).await;

    assert_eq!(result, Err(SessionError::AlreadyJoined));
    assert_eq!(h.sdk.clients().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_join_is_rejected_while_first_in_flight() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::issuing("tok").with_delay(Duration::from_secs(1)),
        FakeSdk::new(),
        Some(0),
    );
    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.join(JoinRequest::new("room1", "alice")).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.controller.state(), SessionState::AwaitingCredential);

    let second = h.controller.join(JoinRequest::new("room1", "bob")).await;
    assert_eq!(second, Err(SessionError::JoinInProgress));

    first.await.unwrap().unwrap();
    assert_eq!(h.credentials.call_count(), 1);
}

#[tokio::test]
async fn test_missing_self_info_still_joins() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        hide_self: true,
        ..ClientBehavior::default()
    }));

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(h.controller.state(), SessionState::Joined);
    assert!(h.controller.roster_view().participants.is_empty());
}

// =============================================================================
// Event mirroring
// =============================================================================

#[tokio::test]
async fn test_duplicate_participant_added_yields_one_entry() {
    let h = Harness::joined().await;

    h.emit(added(2, "bob"));
    h.emit(added(2, "bob"));

    assert_eq!(h.controller.roster_view().count(), 2);
}

#[tokio::test]
async fn test_re_add_with_new_name_is_last_write_wins() {
    let h = Harness::joined().await;

    h.emit(added(2, "bob"));
    h.emit(added(2, "robert"));

    let view = h.controller.roster_view();
    assert_eq!(view.names(), vec!["alice", "robert"]);
    assert_eq!(h.view.last_roster(), Some(view));
}

#[tokio::test]
async fn test_removing_unknown_participant_is_noop() {
    let h = Harness::joined().await;
    let before = h.controller.roster_view();

    h.emit(SdkEvent::ParticipantRemoved { user_id: 42 });

    assert_eq!(h.controller.roster_view(), before);
}

#[tokio::test]
async fn test_every_event_rerenders_roster() {
    let h = Harness::joined().await;
    h.view.clear();

    h.emit(added(2, "bob"));
    h.emit(SdkEvent::PeerVideoStateChanged {
        user_id: 2,
        video_on: true,
    });
    h.emit(SdkEvent::AudioStateChanged {
        user_id: 2,
        audio_on: true,
    });
    h.emit(SdkEvent::ParticipantRemoved { user_id: 2 });

    let renders: Vec<_> = h
        .view
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ViewCall::Roster(_)))
        .collect();
    assert_eq!(renders.len(), 4);
    assert_eq!(h.controller.roster_view().count(), 1);
}

#[tokio::test]
async fn test_remote_media_flags_follow_events() {
    let h = Harness::joined().await;

    h.emit(added(2, "bob"));
    h.emit(SdkEvent::PeerVideoStateChanged {
        user_id: 2,
        video_on: true,
    });

    let view = h.controller.roster_view();
    let bob = view.participants.iter().find(|p| p.participant_id == 2).unwrap();
    assert!(bob.video_on);
    assert!(!bob.audio_on);
}

#[tokio::test]
async fn test_remote_echo_for_self_is_ignored() {
    let h = Harness::joined().await;

    h.emit(SdkEvent::PeerVideoStateChanged {
        user_id: FAKE_SELF_ID,
        video_on: true,
    });

    let view = h.controller.roster_view();
    assert!(!view.participants[0].video_on);
    assert_eq!(h.controller.media_state(), MediaState::default());
}

#[tokio::test]
async fn test_events_from_previous_session_are_ignored() {
    let h = Harness::joined().await;
    h.controller.leave().await.unwrap();
    h.controller
        .join(JoinRequest::new("room2", "alice"))
        .await
        .unwrap();

    let clients = h.sdk.clients();
    assert_eq!(clients.len(), 2);
    clients[0].emit(added(7, "ghost"));

    assert_eq!(h.controller.roster_view().names(), vec!["alice"]);

    clients[1].emit(added(8, "carol"));
    assert_eq!(h.controller.roster_view().names(), vec!["alice", "carol"]);
}

// =============================================================================
// Media toggles
// =============================================================================

#[tokio::test]
async fn test_toggle_video_on_and_off() {
    let h = Harness::joined().await;
    let stream = h.sdk.last_client().stream();

    h.controller.toggle_video().await.unwrap();
    assert!(h.controller.media_state().video_on);
    assert!(h.controller.roster_view().participants[0].video_on);
    assert_eq!(stream.attached(), vec![FAKE_SELF_ID]);
    assert_eq!(
        h.view.calls().last(),
        Some(&ViewCall::Media {
            video_on: true,
            audio_on: false
        })
    );

    h.controller.toggle_video().await.unwrap();
    assert!(!h.controller.media_state().video_on);
    assert_eq!(
        stream.calls(),
        vec![MediaOp::StartVideo, MediaOp::AttachVideo, MediaOp::StopVideo]
    );
}

#[tokio::test]
async fn test_toggle_audio() {
    let h = Harness::joined().await;

    h.controller.toggle_audio().await.unwrap();

    assert_eq!(
        h.controller.media_state(),
        MediaState {
            video_on: false,
            audio_on: true
        }
    );
}

#[tokio::test]
async fn test_rejected_video_start_leaves_flag_off_and_can_retry() {
    let h = Harness::joined().await;
    let stream = h.sdk.last_client().stream();
    stream.fail(MediaOp::StartVideo);

    let result = h.controller.toggle_video().await;

    assert!(matches!(result, Err(SessionError::MediaToggle { .. })));
    assert!(!h.controller.media_state().video_on);
    assert_eq!(h.controller.state(), SessionState::Joined);
    assert_eq!(h.view.last_status().map(|(kind, _)| kind), Some(StatusKind::Error));

    stream.succeed(MediaOp::StartVideo);
    h.controller.toggle_video().await.unwrap();
    assert!(h.controller.media_state().video_on);
}

#[tokio::test]
async fn test_attach_failure_does_not_fail_toggle() {
    let h = Harness::joined().await;
    h.sdk.last_client().stream().fail(MediaOp::AttachVideo);

    h.controller.toggle_video().await.unwrap();

    assert!(h.controller.media_state().video_on);
}

#[tokio::test]
async fn test_toggle_when_not_joined_is_noop() {
    let h = Harness::new();

    h.controller.toggle_video().await.unwrap();
    h.controller.toggle_audio().await.unwrap();

    assert_eq!(h.controller.media_state(), MediaState::default());
    assert!(h.sdk.clients().is_empty());
    assert!(h.view.calls().is_empty());
}

#[tokio::test]
async fn test_auto_start_media_is_best_effort() {
    let settings = ControllerSettings {
        auto_start_media: true,
        ..ControllerSettings::default()
    };
    let sdk = FakeSdk::new();
    let h = Harness::build(settings, FakeCredentialSource::issuing("tok"), sdk, Some(0));

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(
        h.controller.media_state(),
        MediaState {
            video_on: true,
            audio_on: true
        }
    );
}

#[tokio::test]
async fn test_auto_start_failure_only_warns() {
    let settings = ControllerSettings {
        auto_start_media: true,
        ..ControllerSettings::default()
    };
    let sdk = FakeSdk::with_behavior(ClientBehavior {
        media_errors: vec![MediaOp::StartVideo],
        ..ClientBehavior::default()
    });
    let h = Harness::build(settings, FakeCredentialSource::issuing("tok"), sdk, Some(0));

    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert_eq!(h.controller.state(), SessionState::Joined);
    assert_eq!(
        h.controller.media_state(),
        MediaState {
            video_on: false,
            audio_on: true
        }
    );
    assert!(h.view.has_status(StatusKind::Warning));
    assert!(!h.view.has_status(StatusKind::Error));
}

// =============================================================================
// Leave
// =============================================================================

#[tokio::test]
async fn test_leave_when_idle_is_noop() {
    let h = Harness::new();

    h.controller.leave().await.unwrap();

    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.sdk.clients().is_empty());
    assert!(h.view.calls().is_empty());
}

#[tokio::test]
async fn test_leave_resets_everything() {
    let h = Harness::joined().await;
    h.emit(added(2, "bob"));
    h.controller.toggle_video().await.unwrap();
    h.controller.toggle_audio().await.unwrap();
    let client = h.sdk.last_client();

    h.controller.leave().await.unwrap();

    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.controller.room(), None);
    assert_eq!(h.controller.media_state(), MediaState::default());
    assert!(h.controller.roster_view().participants.is_empty());
    assert_eq!(client.leave_count(), 1);

    let ops = client.stream().calls();
    assert!(ops.contains(&MediaOp::StopVideo));
    assert!(ops.contains(&MediaOp::StopAudio));

    assert_eq!(h.view.count(&ViewCall::JoinForm), 1);
    assert_eq!(
        h.view.last_status(),
        Some((StatusKind::Info, "Left session".to_string()))
    );
}

#[tokio::test]
async fn test_leave_skips_stopping_inactive_capture() {
    let h = Harness::joined().await;
    let client = h.sdk.last_client();

    h.controller.leave().await.unwrap();

    assert!(client.stream().calls().is_empty());
}

#[tokio::test]
async fn test_capture_stop_failure_does_not_block_leave() {
    let h = Harness::joined().await;
    h.controller.toggle_video().await.unwrap();
    let client = h.sdk.last_client();
    client.stream().fail(MediaOp::StopVideo);

    h.controller.leave().await.unwrap();

    assert_eq!(client.leave_count(), 1);
    assert_eq!(h.controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_rejected_leave_still_resets() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        leave_error: Some("network lost".to_string()),
        ..ClientBehavior::default()
    }));
    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();
    h.emit(added(2, "bob"));

    let result = h.controller.leave().await;

    assert_eq!(result, Err(SessionError::Leave("network lost".to_string())));
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.controller.roster_view().participants.is_empty());
    assert_eq!(h.view.count(&ViewCall::JoinForm), 1);
    assert_eq!(h.view.last_status().map(|(kind, _)| kind), Some(StatusKind::Error));
}

#[tokio::test(start_paused = true)]
async fn test_leave_during_join_is_rejected() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::issuing("tok").with_delay(Duration::from_secs(1)),
        FakeSdk::new(),
        Some(0),
    );
    let controller = h.controller.clone();
    let join = tokio::spawn(async move { controller.join(JoinRequest::new("room1", "alice")).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    let result = h.controller.leave().await;

    assert_eq!(result, Err(SessionError::JoinInProgress));
    join.await.unwrap().unwrap();
    assert_eq!(h.controller.state(), SessionState::Joined);
    assert_eq!(h.sdk.last_client().leave_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_join_stops_readiness_wait() {
    let h = Harness::build(
        ControllerSettings::default(),
        FakeCredentialSource::issuing("tok"),
        FakeSdk::new(),
        None,
    );
    let controller = h.controller.clone();
    let join = tokio::spawn(async move { controller.join(JoinRequest::new("room1", "alice")).await });

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(h.controller.state(), SessionState::AwaitingSdkReady);
    assert!(h.controller.cancel_join());

    let result = join.await.unwrap();
    assert_eq!(result, Err(SessionError::Cancelled));
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert!(h.locator.checks() < 10);
    assert!(!h.controller.cancel_join());
}

#[tokio::test]
async fn test_generation_advances_per_session() {
    let h = Harness::joined().await;
    let first = h.controller.generation();

    h.controller.leave().await.unwrap();
    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();

    assert!(h.controller.generation() > first);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_sdk_join_leaves_and_resets() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        join_delay: Some(Duration::from_secs(1)),
        ..ClientBehavior::default()
    }));
    let controller = h.controller.clone();
    let join = tokio::spawn(async move { controller.join(JoinRequest::new("room1", "alice")).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.controller.state(), SessionState::Joining);
    assert!(h.controller.cancel_join());

    assert_eq!(join.await.unwrap(), Err(SessionError::Cancelled));
    assert_eq!(h.controller.state(), SessionState::Idle);
    assert_eq!(h.controller.generation(), 0);
    assert!(h.controller.roster_view().participants.is_empty());
    assert_eq!(h.sdk.last_client().leave_count(), 1);
    assert_eq!(h.sdk.last_client().handler_count(SdkEventKind::ParticipantAdded), 0);
    assert_eq!(h.view.count(&ViewCall::JoinForm), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_toggles_issue_one_capture_call() {
    let h = Harness::with_sdk(FakeSdk::with_behavior(ClientBehavior {
        media_delay: Some(Duration::from_millis(200)),
        ..ClientBehavior::default()
    }));
    h.controller
        .join(JoinRequest::new("room1", "alice"))
        .await
        .unwrap();
    let stream = h.sdk.last_client().stream();

    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.toggle_video().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    h.controller.toggle_video().await.unwrap();
    first.await.unwrap().unwrap();

    assert!(h.controller.media_state().video_on);
    assert_eq!(stream.calls(), vec![MediaOp::StartVideo, MediaOp::AttachVideo]);

    h.controller.toggle_video().await.unwrap();
    assert!(!h.controller.media_state().video_on);
}

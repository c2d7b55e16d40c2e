//! End-to-end tests: session client against a real token service instance.

#![allow(clippy::indexing_slicing, clippy::panic)]

use common::secret::ExposeSecret;
use common::types::TokenRequest;
use session_client::credential_client::CredentialSource;
use session_client::{
    ControllerSettings, HttpCredentialClient, JoinRequest, SessionController, SessionError,
    SessionState,
};
use session_test_utils::{FakeLocator, FakeSdk, RecordingView, SdkCall};
use std::collections::HashMap;
use std::sync::Arc;
use token_test_utils::{decode_test_credential, TestTokenServer, TEST_SIGNING_KEY};

#[tokio::test]
async fn test_http_client_receives_verifiable_credential() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let client = HttpCredentialClient::new(server.url())?;

    let credential = client
        .request_credential(&TokenRequest::new("room1", "alice", Some(1)))
        .await?;

    let claims = decode_test_credential(credential.expose_secret());
    assert_eq!(claims.app_key.as_deref(), Some(TEST_SIGNING_KEY));
    assert_eq!(claims.tpc, "room1");
    assert_eq!(claims.user_identity, "alice");
    assert_eq!(claims.role_type, 1);
    assert_eq!(claims.lifetime_secs(), 7200);

    Ok(())
}

#[tokio::test]
async fn test_http_client_surfaces_issuer_error_message() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_with_vars(HashMap::new()).await?;
    let client = HttpCredentialClient::new(server.url())?;

    let result = client
        .request_credential(&TokenRequest::new("room1", "alice", Some(1)))
        .await;

    assert_eq!(
        result.err(),
        Some(SessionError::CredentialRequest(
            "Token generation failed".to_string()
        ))
    );

    Ok(())
}

#[tokio::test]
async fn test_controller_joins_with_issued_credential() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let sdk = FakeSdk::new();
    let controller = SessionController::new(
        ControllerSettings::default(),
        Arc::new(HttpCredentialClient::new(server.url())?),
        Arc::new(FakeLocator::present(sdk.handle())),
        Arc::new(RecordingView::new()),
    );

    controller.join(JoinRequest::new("room1", "alice")).await?;

    assert_eq!(controller.state(), SessionState::Joined);
    let credential = match &sdk.last_client().calls()[1] {
        SdkCall::Join { credential, .. } => credential.clone(),
        other => panic!("expected join call, got {other:?}"),
    };
    let claims = decode_test_credential(&credential);
    assert_eq!(claims.tpc, "room1");
    assert_eq!(claims.user_identity, "alice");

    controller.leave().await?;
    assert_eq!(controller.state(), SessionState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_controller_reports_unreachable_issuer() -> Result<(), anyhow::Error> {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        listener.local_addr()?
    };
    let sdk = FakeSdk::new();
    let controller = SessionController::new(
        ControllerSettings::default(),
        Arc::new(HttpCredentialClient::new(format!("http://{addr}"))?),
        Arc::new(FakeLocator::present(sdk.handle())),
        Arc::new(RecordingView::new()),
    );

    let result = controller.join(JoinRequest::new("room1", "alice")).await;

    assert!(matches!(result, Err(SessionError::CredentialRequest(_))));
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(sdk.clients().is_empty());

    Ok(())
}

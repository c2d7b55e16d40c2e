//! Test server harness for E2E testing
//!
//! Provides `TestTokenServer` for spawning real token service instances in tests.

use common::jwt::{decode_session_claims, SessionClaims};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use token_service::config::Config;
use token_service::routes::{self, AppState};

/// Signing key id configured by [`TestTokenServer::spawn`].
pub const TEST_SIGNING_KEY: &str = "test-sdk-key";

/// Signing secret configured by [`TestTokenServer::spawn`].
pub const TEST_SIGNING_SECRET: &str = "test-sdk-secret";

/// Test harness for spawning the token service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let server = TestTokenServer::spawn().await?;
/// let response = reqwest::Client::new()
///     .post(format!("{}/api/token", server.url()))
///     .json(&serde_json::json!({"sessionName": "room1", "userIdentity": "alice"}))
///     .send()
///     .await?;
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a server with [`TEST_SIGNING_KEY`] and [`TEST_SIGNING_SECRET`].
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::from([
            ("SDK_KEY".to_string(), TEST_SIGNING_KEY.to_string()),
            ("SDK_SECRET".to_string(), TEST_SIGNING_SECRET.to_string()),
        ]))
        .await
    }

    /// Spawn a server from an explicit environment map.
    ///
    /// The server always binds to a random port on 127.0.0.1 regardless of
    /// `PORT`/`BIND_HOST` in `vars`.
    pub async fn spawn_with_vars(vars: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(AppState::new(config.clone()));

        // The global recorder may already be installed by another test in the
        // same process, so build a detached one just for the handle.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Decode a credential issued by a default [`TestTokenServer`].
///
/// Panics if the credential does not verify against [`TEST_SIGNING_SECRET`].
pub fn decode_test_credential(token: &str) -> SessionClaims {
    decode_session_claims(token, TEST_SIGNING_SECRET).expect("credential should verify")
}

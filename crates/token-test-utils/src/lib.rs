//! # Token Test Utilities
//!
//! Shared test utilities for the token service and its clients.
//!
//! This crate provides:
//! - Server test harness (`TestTokenServer` for E2E tests)
//! - Fixed signing material and a matching decode helper
//!
//! ## Usage
//!
//! ```rust,ignore
//! use token_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestTokenServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/health", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

pub use server_harness::*;

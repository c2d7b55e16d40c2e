//! Token Service Library
//!
//! Issues short-lived, signed session credentials that let a browser or
//! native client join a room on the hosted video SDK without ever holding
//! the SDK signing secret.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/credential_issuer.rs -> crypto
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `crypto` - HS256 signing
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Credential issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;

//! Common types shared between the credential issuer and the session client.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for session credential claims and constants
pub mod jwt;

/// Module for HTTP wire types of the token endpoint
pub mod types;

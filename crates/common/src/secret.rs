//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the signing secret and for
//! issued credentials. `SecretString` redacts itself in `Debug`, so any
//! struct deriving `Debug` that holds one is safe to log, and the value is
//! zeroized on drop.
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningConfig {
//!     key_id: String,
//!     secret: SecretString,
//! }
//!
//! let config = SigningConfig {
//!     key_id: "sdk-key".to_string(),
//!     secret: SecretString::from("sdk-secret"),
//! };
//!
//! assert!(!format!("{config:?}").contains("sdk-secret"));
//! assert_eq!(config.secret.expose_secret(), "sdk-secret");
//! ```
//!
//! Use `SecretString` for:
//! - The credential signing secret
//! - Issued session credentials held by the client
//! - Session passcodes

pub use secrecy::{ExposeSecret, SecretString};

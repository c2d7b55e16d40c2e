//! HTTP request handlers for the token service.

pub mod health;
pub mod metrics;
pub mod token;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use token::issue_token;

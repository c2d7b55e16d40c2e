//! Observability for the token service.
//!
//! Credential values, signing secrets and participant identities never
//! appear in logs or metric labels. Handlers use `#[instrument(skip_all)]`
//! and record only bounded fields (status, role).

pub mod metrics;

pub use metrics::{init_metrics_recorder, record_token_issuance};

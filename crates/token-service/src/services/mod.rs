pub mod credential_check;
pub mod credential_issuer;

pub use credential_issuer::{CredentialIssuer, IssuedCredential};

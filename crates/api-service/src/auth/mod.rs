//! Authentication components.
//!
//! - `credentials` - Pluggable credential verification for the login endpoint

pub mod credentials;

pub use credentials::{CredentialError, CredentialVerifier, FixedIdentityVerifier};

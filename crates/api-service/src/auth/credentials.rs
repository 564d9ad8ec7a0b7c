//! Credential verification ahead of token issuance.
//!
//! The login handler asks a [`CredentialVerifier`] to turn the submitted
//! username/password into an [`Identity`] before a token is signed. The
//! shipped [`FixedIdentityVerifier`] accepts every request and binds it to a
//! configured subject.

use async_trait::async_trait;
use common::secret::SecretString;
use common::types::Identity;
use thiserror::Error;

/// Credential verification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Username/password pair was rejected.
    #[error("Invalid username or password")]
    Rejected,
}

/// Verifies login credentials and resolves them to an identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `username`/`password` and return the identity they belong to.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Identity, CredentialError>;
}

/// Verifier that accepts any credentials and returns the same subject.
#[derive(Debug, Clone)]
pub struct FixedIdentityVerifier {
    subject: String,
}

impl FixedIdentityVerifier {
    /// Create a verifier that binds every login to `subject`.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for FixedIdentityVerifier {
    async fn verify_credentials(
        &self,
        _username: &str,
        _password: &SecretString,
    ) -> Result<Identity, CredentialError> {
        Ok(Identity::new(self.subject.clone()))
    }
}

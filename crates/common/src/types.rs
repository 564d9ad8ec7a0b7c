//! Common data types for the API service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated identity: the subject a token asserts.
///
/// Built at login time, embedded into a token as the `sub` claim and
/// recovered when the token is verified. Redacted in Debug output because
/// subjects are user identifiers.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a subject string.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// The subject string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identity, returning the subject string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity").field(&"[REDACTED]").finish()
    }
}

impl From<String> for Identity {
    fn from(subject: String) -> Self {
        Self(subject)
    }
}

impl From<&str> for Identity {
    fn from(subject: &str) -> Self {
        Self(subject.to_string())
    }
}

//! Request and response bodies for the API service.

use common::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Items returned by `GET /items`, in order.
pub const STATIC_ITEMS: [&str; 3] = ["item1", "item2", "item3"];

/// Body of `GET /` and `GET /protected`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemsResponse {
    pub items: Vec<String>,
}

/// Optional body of `POST /login`.
///
/// Both fields may be omitted; the configured credential verifier decides
/// what an absent value means.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<SecretString>,
}

/// Body of `POST /login`.
///
/// The token is a bearer credential, so Debug never prints it.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

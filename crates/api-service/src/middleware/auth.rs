//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, verifies it with
//! the token codec, and injects the authenticated [`Identity`] into request
//! extensions. Every failure is a 401; the specific reason is only logged and
//! counted.

use crate::errors::ApiError;
use crate::observability::metrics::record_token_verification;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::IntoResponse,
};
use common::jwt::{TokenCodec, TokenError};
use common::types::Identity;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Token codec holding the verification key.
    pub token_codec: Arc<TokenCodec>,
}

/// Reasons a request is not authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unauthorized {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl Unauthorized {
    /// Bounded label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Unauthorized::MissingHeader => "missing",
            Unauthorized::MalformedHeader => "malformed",
            Unauthorized::Token(err) => err.kind(),
        }
    }
}

impl From<Unauthorized> for ApiError {
    fn from(err: Unauthorized) -> Self {
        match err {
            Unauthorized::Token(token_err) => ApiError::from(token_err),
            Unauthorized::MissingHeader => ApiError::MissingToken,
            header_err @ Unauthorized::MalformedHeader => ApiError::InvalidToken(header_err.to_string()),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(headers: &HeaderMap) -> Result<&str, Unauthorized> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(Unauthorized::MissingHeader)?;

    let value = header.to_str().map_err(|_| Unauthorized::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(Unauthorized::MalformedHeader)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(Unauthorized::MalformedHeader);
    }

    Ok(token)
}

/// Decide whether a request carries a valid bearer token.
///
/// Never panics on malformed input: missing headers, wrong schemes and bad
/// tokens all come back as [`Unauthorized`].
pub fn authorize(headers: &HeaderMap, codec: &TokenCodec) -> Result<Identity, Unauthorized> {
    let token = bearer_token(headers)?;
    Ok(codec.verify(token)?)
}

/// Authentication middleware that validates bearer tokens.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - Returns 401 Unauthorized with WWW-Authenticate header if the token is
///   missing or invalid; the handler is not invoked
/// - Continues to the next handler with the [`Identity`] in extensions otherwise
#[instrument(skip(state, req, next), name = "api.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let identity = match authorize(req.headers(), &state.token_codec) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::debug!(
                target: "api.middleware.auth",
                outcome = err.outcome(),
                "Request rejected: not authenticated"
            );
            record_token_verification(err.outcome());
            return Err(err.into());
        }
    };

    record_token_verification("success");

    // Store identity in request extensions for downstream handlers
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

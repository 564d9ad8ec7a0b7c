//! Protected route handler.
//!
//! Only reachable through the `require_auth` middleware, which places the
//! caller's [`Identity`] in request extensions.

use crate::models::MessageResponse;
use axum::{Extension, Json};
use common::types::Identity;
use tracing::instrument;

/// Message returned to authenticated callers.
pub const PROTECTED_MESSAGE: &str = "Protected route";

/// Handler for GET /protected
#[instrument(skip_all, name = "api.handlers.protected")]
pub async fn protected(Extension(identity): Extension<Identity>) -> Json<MessageResponse> {
    tracing::debug!(target: "api.handlers.protected", ?identity, "Serving protected route");

    Json(MessageResponse::new(PROTECTED_MESSAGE))
}

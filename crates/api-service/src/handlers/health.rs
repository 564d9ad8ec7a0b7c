//! Health check handler.

use crate::models::MessageResponse;
use axum::Json;
use tracing::instrument;

/// Message returned by the health check.
pub const HEALTH_MESSAGE: &str = "API is running";

/// Handler for GET /
///
/// Liveness check. Always returns 200:
///
/// ```json
/// { "message": "API is running" }
/// ```
#[instrument(skip_all, name = "api.health.check")]
pub async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse::new(HEALTH_MESSAGE))
}

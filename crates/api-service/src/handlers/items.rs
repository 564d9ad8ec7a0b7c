//! Static item listing.

use crate::models::{ItemsResponse, STATIC_ITEMS};
use axum::Json;
use tracing::instrument;

/// Handler for GET /items
///
/// Returns the fixed item list, always in the same order.
#[instrument(skip_all, name = "api.handlers.items")]
pub async fn list_items() -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: STATIC_ITEMS.iter().map(|item| item.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_items_order() {
        let Json(response) = list_items().await;
        assert_eq!(response.items, vec!["item1", "item2", "item3"]);
    }
}

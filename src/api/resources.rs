//! Generic Resource Endpoints
//!
//! Nested resources (accounts, companies, promotions, contests) share one
//! CRUD surface parameterized by URL templates from the page config.

use serde_json::Value;

use super::client::{self, Envelope};
use crate::models::RowId;

pub async fn list(list_url: &str, query: &str) -> Envelope {
    client::get(&format!("{}?{}", list_url, query)).await
}

/// Fetch a single record for the edit form
pub async fn fetch_item(get_item_url: &str, id: &RowId) -> Envelope {
    client::get(&format!("{}/{}", get_item_url, id)).await
}

pub async fn create(update_item_url: &str, payload: Value) -> Envelope {
    client::post(update_item_url, payload).await
}

pub async fn update(update_item_url: &str, id: &RowId, payload: Value) -> Envelope {
    client::put(&format!("{}/{}", update_item_url, id), payload).await
}

pub async fn delete_item(delete_url: &str, id: &RowId) -> Envelope {
    client::delete(&format!("{}/{}", delete_url, id)).await
}

pub async fn toggle_active(toggle_active_url: &str, id: &RowId) -> Envelope {
    client::patch(&format!("{}/{}", toggle_active_url, id)).await
}

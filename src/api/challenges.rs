//! Challenge Matrix Endpoints
//!
//! Tab lists per level, default-tab cloning, and order persistence for
//! the drag-reorderable category/step/amount strips.

use serde::Serialize;
use serde_json::json;

use super::client::{self, Envelope};
use crate::models::ChallengeTabKind;

#[derive(Serialize)]
struct OrderBody<'a> {
    tab_ids: &'a [i64],
}

/// Tabs of one level for a broker. Steps and amounts are scoped to the
/// selected category.
pub async fn list_tabs(
    broker_id: i64,
    kind: ChallengeTabKind,
    category_id: Option<i64>,
) -> Envelope {
    let mut path = format!("/challenges/{}/{}", kind.as_str(), broker_id);
    if let Some(category_id) = category_id {
        path.push_str(&format!("?broker_challenge_category_id={}", category_id));
    }
    client::get(&path).await
}

/// Default tab templates available for cloning at one level
pub async fn list_default_tabs(kind: ChallengeTabKind) -> Envelope {
    client::get(&format!("/challenges/{}/default-tabs", kind.as_str())).await
}

/// Clone a default tab into the broker's tab list
pub async fn clone_default_tab(
    kind: ChallengeTabKind,
    broker_id: i64,
    default_tab_id: i64,
    category_id: Option<i64>,
) -> Envelope {
    let mut path = format!(
        "/challenges/{}/{}?default_tab_id_to_clone={}",
        kind.as_str(),
        broker_id,
        default_tab_id
    );
    if let Some(category_id) = category_id {
        path.push_str(&format!("&broker_challenge_category_id={}", category_id));
    }
    client::post(&path, json!({})).await
}

/// Persist the new tab order after a drop
pub async fn persist_order(
    broker_id: i64,
    kind: ChallengeTabKind,
    tab_ids: &[i64],
) -> Envelope {
    let path = format!("/challenges/{}/tabs/{}/order", broker_id, kind.as_str());
    client::put(&path, serde_json::to_value(OrderBody { tab_ids }).unwrap_or_default()).await
}

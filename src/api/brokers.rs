//! Broker Endpoints

use super::client::{self, Envelope};

/// Filterable, sortable, paginated broker list
pub async fn list(query: &str) -> Envelope {
    client::get(&format!("/brokers/broker-list?{}", query)).await
}

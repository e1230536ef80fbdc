//! Rebate Matrix Endpoints

use super::client::{self, Envelope};
use crate::models::RebateMatrix;

pub async fn get_matrix(broker_id: i64) -> Envelope {
    client::get(&format!("/rebates/{}", broker_id)).await
}

pub async fn save_matrix(broker_id: i64, matrix: &RebateMatrix) -> Envelope {
    client::put(
        &format!("/rebates/{}", broker_id),
        serde_json::to_value(matrix).unwrap_or_default(),
    )
    .await
}

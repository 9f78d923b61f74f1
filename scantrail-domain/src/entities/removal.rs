// Removal request/response contracts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub operator: String,
    #[serde(rename = "box")]
    pub box_ref: String,
    pub code: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkRemoveRequest {
    pub operator: String,
    pub uuids: Vec<Uuid>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub ok: bool,
    pub message: String,
    pub removed_count: u64,
}

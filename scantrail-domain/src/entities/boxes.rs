// Box hierarchy read models
// Owned three-level tree: client -> city -> box -> deduplicated items

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct BoxItem {
    pub ts: String,
    #[serde(rename = "tsMs")]
    pub ts_ms: i64,
    pub code: String,
    pub operator: String,
    pub uuid: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxDetails {
    pub client: String,
    pub city: String,
    #[serde(rename = "boxNo")]
    pub box_no: String,
    #[serde(rename = "itemsCount")]
    pub items_count: usize,
    #[serde(rename = "firstAt")]
    pub first_at: String,
    #[serde(rename = "lastAt")]
    pub last_at: String,
    pub operators: Vec<String>,
    pub items: Vec<BoxItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityBoxes {
    pub city: String,
    pub boxes: Vec<BoxDetails>,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    #[serde(rename = "totalBoxes")]
    pub total_boxes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientBoxes {
    pub client: String,
    pub cities: Vec<CityBoxes>,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    #[serde(rename = "totalBoxes")]
    pub total_boxes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxesStateResponse {
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub filters: crate::entities::AppliedFilters,
    pub clients: Vec<ClientBoxes>,
}

// Raw log read models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RawLogEvent {
    pub uuid: Uuid,
    pub ts: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub operator: String,
    pub client: String,
    pub city: String,
    #[serde(rename = "box")]
    pub box_ref: String,
    pub code: String,
    pub details: Option<String>,
    #[serde(rename = "receivedAt")]
    pub received_at: String,
    pub source: String,
    #[serde(rename = "tsMs")]
    pub ts_ms: i64,
    #[serde(rename = "receivedAtMs")]
    pub received_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawLogsResponse {
    pub logs: Vec<RawLogEvent>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLogQuery {
    pub date: Option<String>,
    pub date_end: Option<String>,
    pub operator: Option<String>,
    pub client: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub limit: Option<usize>,
}

/// Query parameters for the CSV exports. Exports run over a single day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub date: Option<String>,
    pub operator: Option<String>,
    pub client: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

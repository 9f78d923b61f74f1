// Event entity
// One immutable record of a scan/lifecycle action in the field

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate event as produced by a field device. Deserialization is
/// deliberately lenient: required-field and timestamp checks happen
/// per item in the deduplicator so one bad candidate never rejects a
/// whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanEvent {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "box")]
    pub box_ref: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

pub const DEFAULT_SOURCE: &str = "pwa";
pub const DASHBOARD_SOURCE: &str = "dashboard";

/// Persisted event record. Both timestamps are unix milliseconds:
/// `event_time_ms` is device-supplied business time, `received_at_ms`
/// is server receipt time and orders the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: Uuid,
    pub event_time_ms: i64,
    pub event_type: String,
    pub operator: String,
    pub client: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "box")]
    pub box_ref: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub received_at_ms: i64,
    pub source: String,
    pub created_at_ms: i64,
}

// Ingest request/response contracts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::ScanEvent;

/// Batch envelope posted by a device. Events without a `source` inherit
/// the envelope-level one.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub events: Vec<ScanEvent>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Ingest outcome surfaced to the caller. `duplicates` lists every
/// identifier that was already present (in the store or earlier in the
/// same batch) so a retrying client can tell exactly which of its items
/// still need sending.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub ok: bool,
    pub inserted: usize,
    pub skipped: usize,
    pub duplicates: Vec<Uuid>,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub uuids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    pub present: Vec<Uuid>,
}

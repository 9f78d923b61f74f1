// Dashboard read models

use serde::{Deserialize, Serialize};

/// Per-operator activity rollup for the live dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorStats {
    pub operator: String,
    pub online: bool,
    #[serde(rename = "onlineAgeSec")]
    pub online_age_sec: i64,
    #[serde(rename = "lastSeenMs")]
    pub last_seen_ms: i64,
    #[serde(rename = "lastClient")]
    pub last_client: String,
    #[serde(rename = "lastCity")]
    pub last_city: String,
    #[serde(rename = "lastBox")]
    pub last_box: String,
    #[serde(rename = "itemsToday")]
    pub items_today: usize,
    #[serde(rename = "errorsToday")]
    pub errors_today: usize,
    #[serde(rename = "lastSeenAt")]
    pub last_seen_at: String,
}

/// Per-client event counters. These are raw event counts, not
/// deduplicated item counts.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub client: String,
    pub items: usize,
    #[serde(rename = "boxesOpen")]
    pub boxes_open: usize,
    #[serde(rename = "boxesClose")]
    pub boxes_close: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedEvent {
    pub ts: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub client: String,
    pub city: String,
    #[serde(rename = "box")]
    pub box_no: String,
    pub code: String,
}

/// Window totals. `items` collapses to distinct identifiers; the other
/// counters are verbatim event counts.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub items: usize,
    pub opens: usize,
    pub closes: usize,
    pub errors: usize,
}

/// Pure output of the aggregator over one queried window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub operators: Vec<OperatorStats>,
    pub clients: Vec<ClientStats>,
    pub feed: Vec<FeedEvent>,
    pub summary: Summary,
    #[serde(rename = "operatorsList")]
    pub operators_list: Vec<String>,
    #[serde(rename = "clientsList")]
    pub clients_list: Vec<String>,
    #[serde(rename = "citiesList")]
    pub cities_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStateResponse {
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub filters: AppliedFilters,
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppliedFilters {
    pub date: Option<String>,
    pub date_end: Option<String>,
    pub operator: Option<String>,
    pub client: Option<String>,
    pub city: Option<String>,
}

/// Query parameters shared by the dashboard and boxes views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
    pub date_end: Option<String>,
    pub operator: Option<String>,
    pub client: Option<String>,
    pub city: Option<String>,
}

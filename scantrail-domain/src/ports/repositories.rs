use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::StoredEvent;

/// Window + equality filters a store query runs under. Bounds are
/// inclusive unix milliseconds over business time (`event_time_ms`).
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub start_ms: i64,
    pub end_ms: i64,
    pub operator: Option<String>,
    pub client: Option<String>,
    pub city: Option<String>,
    pub event_type: Option<String>,
}

impl EventFilter {
    pub fn window(start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    EventTimeAsc,
    ReceivedAtDesc,
}

/// The event store owns every persisted record. Aggregation reads a
/// point-in-time snapshot from one `fetch_events` call and never goes
/// back to the store mid-computation.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Insert the batch atomically: either every event lands or none do.
    async fn insert_events(&self, events: &[StoredEvent]) -> anyhow::Result<()>;

    /// Which of the supplied identifiers are already stored. One batched
    /// lookup, never one query per id.
    async fn existing_ids(&self, ids: &[Uuid]) -> anyhow::Result<HashSet<Uuid>>;

    async fn fetch_events(
        &self,
        filter: &EventFilter,
        order: EventOrder,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<StoredEvent>>;

    /// Physically delete every event whose id is in the set and return
    /// the count actually removed.
    async fn delete_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<u64>;

    async fn ping(&self) -> anyhow::Result<()>;
}

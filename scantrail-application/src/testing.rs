// Test support: an in-memory implementation of the event-store port so
// command/query tests exercise the same trait the ClickHouse repository
// implements.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::{current_millis, RuntimeConfig, StoredEvent};

use crate::{AppState, Metrics};

#[derive(Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<StoredEvent>>,
}

impl MemoryEventStore {
    pub fn seed(&self, events: Vec<StoredEvent>) {
        self.events.lock().unwrap().extend(events);
    }

    pub fn events(&self) -> Vec<StoredEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_events(&self, events: &[StoredEvent]) -> Result<()> {
        let mut stored = self.events.lock().unwrap();
        let known: HashSet<Uuid> = stored.iter().map(|e| e.id).collect();
        if let Some(collision) = events.iter().find(|e| known.contains(&e.id)) {
            // uniqueness violation rejects the whole batch
            return Err(anyhow!("duplicate id {}", collision.id));
        }
        stored.extend(events.iter().cloned());
        Ok(())
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.id)
            .filter(|id| wanted.contains(id))
            .collect())
    }

    async fn fetch_events(
        &self,
        filter: &EventFilter,
        order: EventOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredEvent>> {
        let mut matched: Vec<StoredEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_time_ms >= filter.start_ms && e.event_time_ms <= filter.end_ms)
            .filter(|e| matches(&filter.operator, &e.operator))
            .filter(|e| matches_opt(&filter.client, &e.client))
            .filter(|e| matches_opt(&filter.city, &e.city))
            .filter(|e| matches(&filter.event_type, &e.event_type))
            .cloned()
            .collect();
        match order {
            EventOrder::EventTimeAsc => matched.sort_by_key(|e| e.event_time_ms),
            EventOrder::ReceivedAtDesc => {
                matched.sort_by(|a, b| b.received_at_ms.cmp(&a.received_at_ms))
            }
        }
        if let Some(limit) = limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64> {
        let doomed: HashSet<Uuid> = ids.iter().copied().collect();
        let mut stored = self.events.lock().unwrap();
        let before = stored.len();
        stored.retain(|e| !doomed.contains(&e.id));
        Ok((before - stored.len()) as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

fn matches(wanted: &Option<String>, actual: &str) -> bool {
    wanted.as_deref().map(|w| w == actual).unwrap_or(true)
}

fn matches_opt(wanted: &Option<String>, actual: &Option<String>) -> bool {
    wanted
        .as_deref()
        .map(|w| actual.as_deref() == Some(w))
        .unwrap_or(true)
}

pub fn test_state(store: Arc<MemoryEventStore>) -> AppState {
    AppState {
        config: RuntimeConfig::default(),
        event_store: store,
        metrics: Arc::new(Metrics::default()),
    }
}

/// Stored event `offset_ms` after the current instant, inside the
/// current day so date-defaulted queries see it.
pub fn seed_event(event_type: &str, operator: &str, box_ref: &str, offset_ms: i64) -> StoredEvent {
    let base = current_millis();
    StoredEvent {
        id: Uuid::new_v4(),
        event_time_ms: base + offset_ms,
        event_type: event_type.to_string(),
        operator: operator.to_string(),
        client: Some("C1".to_string()),
        city: Some("Moscow".to_string()),
        box_ref: Some(box_ref.to_string()),
        code: Some("4600000000017".to_string()),
        details: None,
        received_at_ms: base + offset_ms,
        source: "pwa".to_string(),
        created_at_ms: base + offset_ms,
    }
}

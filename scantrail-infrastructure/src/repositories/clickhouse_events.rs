use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::StoredEvent;

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Clone)]
pub struct ClickhouseEventStore {
    client: Client,
    database: String,
}

#[derive(Debug, Row, Serialize, Deserialize)]
struct ScanEventRow {
    #[serde(with = "clickhouse::serde::uuid")]
    event_id: Uuid,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    event_time: OffsetDateTime,
    event_type: String,
    operator: String,
    client: String,
    city: String,
    box_ref: String,
    code: String,
    details: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    received_at: OffsetDateTime,
    source: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    created_at: OffsetDateTime,
}

const SELECT_COLUMNS: &str = "event_id, event_time, event_type, operator, client, city, \
                              box_ref, code, details, received_at, source, created_at";

impl ClickhouseEventStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }
}

#[async_trait]
impl EventStore for ClickhouseEventStore {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS scan_events (
    event_id UUID,
    event_time DateTime64(3),
    event_type String,
    operator String,
    client String,
    city String,
    box_ref String,
    code String,
    details String,
    received_at DateTime64(3),
    source String,
    created_at DateTime64(3)
) ENGINE = MergeTree
PARTITION BY toDate(event_time)
ORDER BY (event_time, operator, client)
"#;
        self.client.query(create_events).execute().await?;
        Ok(())
    }

    async fn insert_events(&self, events: &[StoredEvent]) -> Result<()> {
        let mut insert = self.client.insert("scan_events")?;
        for event in events {
            insert
                .write(&ScanEventRow {
                    event_id: event.id,
                    event_time: millis_to_utc(event.event_time_ms),
                    event_type: event.event_type.clone(),
                    operator: event.operator.clone(),
                    client: event.client.clone().unwrap_or_default(),
                    city: event.city.clone().unwrap_or_default(),
                    box_ref: event.box_ref.clone().unwrap_or_default(),
                    code: event.code.clone().unwrap_or_default(),
                    details: event.details.clone().unwrap_or_default(),
                    received_at: millis_to_utc(event.received_at_ms),
                    source: event.source.clone(),
                    created_at: millis_to_utc(event.created_at_ms),
                })
                .await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let query = format!(
            "SELECT DISTINCT toString(event_id) FROM scan_events WHERE event_id IN ({})",
            id_list(ids)
        );
        let rows = self.client.query(&query).fetch_all::<String>().await?;
        Ok(rows
            .iter()
            .filter_map(|value| Uuid::parse_str(value).ok())
            .collect())
    }

    async fn fetch_events(
        &self,
        filter: &EventFilter,
        order: EventOrder,
        limit: Option<usize>,
    ) -> Result<Vec<StoredEvent>> {
        let mut query = format!(
            "SELECT {} FROM scan_events \
             WHERE event_time >= fromUnixTimestamp64Milli({}) \
             AND event_time <= fromUnixTimestamp64Milli({})",
            SELECT_COLUMNS, filter.start_ms, filter.end_ms
        );
        if let Some(operator) = &filter.operator {
            query.push_str(&format!(" AND operator = '{}'", sql_escape(operator)));
        }
        if let Some(client) = &filter.client {
            query.push_str(&format!(" AND client = '{}'", sql_escape(client)));
        }
        if let Some(city) = &filter.city {
            query.push_str(&format!(" AND city = '{}'", sql_escape(city)));
        }
        if let Some(event_type) = &filter.event_type {
            query.push_str(&format!(" AND event_type = '{}'", sql_escape(event_type)));
        }
        query.push_str(match order {
            EventOrder::EventTimeAsc => " ORDER BY event_time ASC",
            EventOrder::ReceivedAtDesc => " ORDER BY received_at DESC",
        });
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        let rows = self.client.query(&query).fetch_all::<ScanEventRow>().await?;
        Ok(rows.into_iter().map(to_stored).collect())
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let list = id_list(ids);
        let count_query = format!(
            "SELECT count() FROM scan_events WHERE event_id IN ({})",
            list
        );
        let matched = self.client.query(&count_query).fetch_one::<u64>().await?;
        if matched == 0 {
            return Ok(0);
        }
        let delete_query = format!(
            "ALTER TABLE scan_events DELETE WHERE event_id IN ({}) SETTINGS mutations_sync = 1",
            list
        );
        self.client.query(&delete_query).execute().await?;
        Ok(matched)
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

fn to_stored(row: ScanEventRow) -> StoredEvent {
    StoredEvent {
        id: row.event_id,
        event_time_ms: utc_to_millis(row.event_time),
        event_type: row.event_type,
        operator: row.operator,
        client: non_empty(row.client),
        city: non_empty(row.city),
        box_ref: non_empty(row.box_ref),
        code: non_empty(row.code),
        details: non_empty(row.details),
        received_at_ms: utc_to_millis(row.received_at),
        source: row.source,
        created_at_ms: utc_to_millis(row.created_at),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn id_list(ids: &[Uuid]) -> String {
    ids.iter()
        .map(|id| format!("'{}'", id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sql_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_quotes_every_identifier() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(id_list(&[a, b]), format!("'{}', '{}'", a, b));
    }

    #[test]
    fn sql_escape_neutralizes_quotes() {
        assert_eq!(sql_escape("O'Hare"), "O\\'Hare");
        assert_eq!(sql_escape("a\\b"), "a\\\\b");
    }

    #[test]
    fn empty_columns_become_none() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}

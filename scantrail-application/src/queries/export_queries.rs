use tracing::info;

use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::value_objects::{box_number, EventType, MISSING_LABEL};
use scantrail_domain::{day_range, format_millis, today, ExportQuery, StoredEvent};

use crate::queries::dashboard_queries::clean;
use crate::{AppError, AppState};

const DELIMITER: char = ';';
/// Lets Excel detect UTF-8.
const BOM: char = '\u{feff}';

#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Full-log export for one day, one row per event in business-time
/// order.
pub async fn export_csv(state: &AppState, query: ExportQuery) -> Result<CsvExport, AppError> {
    let range = day_range(query.date.as_deref(), None)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let filter = EventFilter {
        operator: clean(&query.operator),
        client: clean(&query.client),
        event_type: clean(&query.event_type),
        ..EventFilter::window(range.start_ms, range.end_ms)
    };
    let events = state
        .event_store
        .fetch_events(&filter, EventOrder::EventTimeAsc, None)
        .await
        .map_err(AppError::Internal)?;

    let mut content = String::new();
    content.push(BOM);
    push_row(
        &mut content,
        &[
            "uuid",
            "ts",
            "type",
            "operator",
            "client",
            "city",
            "box",
            "code",
            "details",
            "received_at",
            "source",
        ],
    );
    for event in &events {
        push_row(
            &mut content,
            &[
                &event.id.to_string(),
                &format_millis(event.event_time_ms),
                &event.event_type,
                &event.operator,
                event.client.as_deref().unwrap_or_default(),
                event.city.as_deref().unwrap_or_default(),
                event.box_ref.as_deref().unwrap_or_default(),
                &excel_code(event.code.as_deref()),
                event.details.as_deref().unwrap_or_default(),
                &format_millis(event.received_at_ms),
                &event.source,
            ],
        );
    }

    let date_part = export_date(&query.date);
    info!("csv export: {} events, date={}", events.len(), date_part);
    Ok(CsvExport {
        filename: format!("scanner_logs_{}.csv", date_part),
        content,
    })
}

/// Flat per-box export: `ITEM` events only, deduplicated by identifier,
/// grouped by client/city/box through the sort order.
pub async fn export_boxes_csv(state: &AppState, query: ExportQuery) -> Result<CsvExport, AppError> {
    let range = day_range(query.date.as_deref(), None)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let filter = EventFilter {
        client: clean(&query.client),
        event_type: Some(EventType::Item.as_str().to_string()),
        ..EventFilter::window(range.start_ms, range.end_ms)
    };
    let mut events = state
        .event_store
        .fetch_events(&filter, EventOrder::EventTimeAsc, None)
        .await
        .map_err(AppError::Internal)?;
    events.sort_by(|a, b| {
        sort_key(a)
            .cmp(&sort_key(b))
            .then(a.event_time_ms.cmp(&b.event_time_ms))
    });

    let mut content = String::new();
    content.push(BOM);
    push_row(
        &mut content,
        &["client", "city", "box", "code", "scanned_at", "operator"],
    );
    let mut seen = std::collections::HashSet::new();
    let mut rows = 0usize;
    for event in &events {
        if !seen.insert(event.id) {
            continue;
        }
        rows += 1;
        push_row(
            &mut content,
            &[
                event.client.as_deref().unwrap_or(MISSING_LABEL),
                event.city.as_deref().unwrap_or(MISSING_LABEL),
                &box_number(event.box_ref.as_deref().unwrap_or_default()),
                &excel_code(event.code.as_deref()),
                &format_millis(event.event_time_ms),
                &event.operator,
            ],
        );
    }

    let date_part = export_date(&query.date);
    info!("boxes csv export: {} items, date={}", rows, date_part);
    Ok(CsvExport {
        filename: format!("boxes_{}.csv", date_part),
        content,
    })
}

fn sort_key(event: &StoredEvent) -> (String, String, String) {
    (
        event.client.clone().unwrap_or_default(),
        event.city.clone().unwrap_or_default(),
        event.box_ref.clone().unwrap_or_default(),
    )
}

fn export_date(date: &Option<String>) -> String {
    date.clone()
        .unwrap_or_else(|| today().format("%Y-%m-%d").to_string())
}

/// Wraps a barcode as `="..."` so Excel keeps it literal instead of
/// rendering scientific notation.
fn excel_code(code: Option<&str>) -> String {
    match code {
        Some(code) if !code.is_empty() => format!("=\"{}\"", code),
        _ => String::new(),
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(DELIMITER);
        }
        out.push_str(&escape(field));
    }
    out.push_str("\r\n");
}

fn escape(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_event, test_state, MemoryEventStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn export_rows_are_delimited_and_bom_prefixed() {
        let store = Arc::new(MemoryEventStore::default());
        store.seed(vec![seed_event("ITEM", "alice", "C1/5", 0)]);
        let state = test_state(store);

        let export = export_csv(&state, ExportQuery::default()).await.expect("export");
        assert!(export.content.starts_with(BOM));
        let lines: Vec<&str> = export.content.trim_start_matches(BOM).split("\r\n").collect();
        assert!(lines[0].starts_with("uuid;ts;type;operator"));
        assert!(lines[1].contains(";alice;"));
        assert!(export.filename.starts_with("scanner_logs_"));
    }

    #[tokio::test]
    async fn barcode_gets_the_excel_guard() {
        let store = Arc::new(MemoryEventStore::default());
        store.seed(vec![seed_event("ITEM", "alice", "C1/5", 0)]);
        let state = test_state(store);

        let export = export_csv(&state, ExportQuery::default()).await.expect("export");
        // the ="..." wrapper itself needs csv quoting
        assert!(export.content.contains("\"=\"\"4600000000017\"\"\""));
    }

    #[test]
    fn fields_with_delimiter_or_quotes_are_escaped() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a;b"), "\"a;b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[tokio::test]
    async fn boxes_export_deduplicates_and_keeps_only_items() {
        let store = Arc::new(MemoryEventStore::default());
        let scan = seed_event("ITEM", "alice", "C1/5", 0);
        let mut resync = scan.clone();
        resync.event_time_ms += 5;
        store.seed(vec![
            scan,
            resync,
            seed_event("BOX", "alice", "C1/5", 1),
            seed_event("ITEM", "bob", "C1/6", 2),
        ]);
        let state = test_state(store);

        let export = export_boxes_csv(&state, ExportQuery::default())
            .await
            .expect("export");
        let lines: Vec<&str> = export
            .content
            .trim_start_matches(BOM)
            .trim_end()
            .split("\r\n")
            .collect();
        // header + two deduplicated items, the BOX event contributes nothing
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "client;city;box;code;scanned_at;operator");
        assert!(lines[1].ends_with(";alice"));
        assert!(lines[2].ends_with(";bob"));
    }
}

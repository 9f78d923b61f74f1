use tracing::debug;

use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::{day_range, format_millis, RawLogEvent, RawLogQuery, RawLogsResponse};

use crate::queries::dashboard_queries::clean;
use crate::{AppError, AppState};

const DEFAULT_LIMIT: usize = 1000;
const MAX_LIMIT: usize = 10_000;

/// Raw, unaggregated log view ordered by receipt time descending.
pub async fn raw_logs(state: &AppState, query: RawLogQuery) -> Result<RawLogsResponse, AppError> {
    let range = day_range(query.date.as_deref(), query.date_end.as_deref())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let filter = EventFilter {
        operator: clean(&query.operator),
        client: clean(&query.client),
        city: clean(&query.city),
        event_type: clean(&query.event_type),
        ..EventFilter::window(range.start_ms, range.end_ms)
    };
    let events = state
        .event_store
        .fetch_events(&filter, EventOrder::ReceivedAtDesc, Some(limit))
        .await
        .map_err(AppError::Internal)?;
    debug!("raw logs: {} events in window", events.len());

    let logs: Vec<RawLogEvent> = events
        .into_iter()
        .map(|event| RawLogEvent {
            uuid: event.id,
            ts: format_millis(event.event_time_ms),
            event_type: event.event_type,
            operator: event.operator,
            client: event.client.unwrap_or_default(),
            city: event.city.unwrap_or_default(),
            box_ref: event.box_ref.unwrap_or_default(),
            code: event.code.unwrap_or_default(),
            details: event.details,
            received_at: format_millis(event.received_at_ms),
            source: event.source,
            ts_ms: event.event_time_ms,
            received_at_ms: event.received_at_ms,
        })
        .collect();

    Ok(RawLogsResponse {
        total: logs.len(),
        logs,
    })
}

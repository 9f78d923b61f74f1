use tracing::debug;

use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::services::aggregator;
use scantrail_domain::{
    current_millis, day_range, now_rfc3339, AppliedFilters, DashboardQuery,
    DashboardStateResponse,
};

use crate::{AppError, AppState};

/// Live dashboard view: one snapshot query against the store, then the
/// pure aggregator over the returned window.
pub async fn dashboard_state(
    state: &AppState,
    query: DashboardQuery,
) -> Result<DashboardStateResponse, AppError> {
    let range = day_range(query.date.as_deref(), query.date_end.as_deref())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    debug!(
        "dashboard window {}..{} operator={:?} client={:?} city={:?}",
        range.start_ms, range.end_ms, query.operator, query.client, query.city
    );

    let filter = EventFilter {
        operator: clean(&query.operator),
        client: clean(&query.client),
        city: clean(&query.city),
        ..EventFilter::window(range.start_ms, range.end_ms)
    };
    let events = state
        .event_store
        .fetch_events(&filter, EventOrder::EventTimeAsc, None)
        .await
        .map_err(AppError::Internal)?;

    let snapshot = aggregator::summarize(
        &events,
        current_millis(),
        state.config.online_threshold_seconds,
    );
    Ok(DashboardStateResponse {
        generated_at: now_rfc3339(),
        filters: AppliedFilters {
            date: query.date,
            date_end: query.date_end,
            operator: query.operator,
            client: query.client,
            city: query.city,
        },
        snapshot,
    })
}

pub(crate) fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

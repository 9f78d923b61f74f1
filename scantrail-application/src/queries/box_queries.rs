use scantrail_domain::ports::{EventFilter, EventOrder, EventStore};
use scantrail_domain::services::rollup;
use scantrail_domain::{day_range, now_rfc3339, AppliedFilters, BoxesStateResponse, DashboardQuery};

use crate::queries::dashboard_queries::clean;
use crate::{AppError, AppState};

/// Box hierarchy view. Same window/filter contract as the dashboard so
/// both views agree for an identical query.
pub async fn boxes_state(
    state: &AppState,
    query: DashboardQuery,
) -> Result<BoxesStateResponse, AppError> {
    let range = day_range(query.date.as_deref(), query.date_end.as_deref())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
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

    Ok(BoxesStateResponse {
        generated_at: now_rfc3339(),
        filters: AppliedFilters {
            date: query.date,
            date_end: query.date_end,
            operator: query.operator,
            client: query.client,
            city: query.city,
        },
        clients: rollup::build_hierarchy(&events),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ingest_commands;
    use crate::testing::{test_state, MemoryEventStore};
    use scantrail_domain::{current_millis, BatchRequest, ScanEvent};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn duplicate_scan_lands_once_in_its_box() {
        let store = Arc::new(MemoryEventStore::default());
        let state = test_state(store);
        let id = Uuid::new_v4();
        let ts = current_millis() - 1_000;
        let scan = ScanEvent {
            uuid: Some(id),
            ts: Some(ts),
            event_type: "ITEM".to_string(),
            operator: "alice".to_string(),
            client: Some("C1".to_string()),
            city: Some("Moscow".to_string()),
            box_ref: Some("C1/5".to_string()),
            code: Some("4600000000017".to_string()),
            details: None,
            source: None,
        };

        ingest_commands::process_batch(
            &state,
            BatchRequest {
                events: vec![scan.clone(), scan],
                source: None,
            },
        )
        .await
        .expect("ingest");

        let boxes = boxes_state(&state, DashboardQuery::default())
            .await
            .expect("boxes");
        assert_eq!(boxes.clients.len(), 1);
        let client = &boxes.clients[0];
        assert_eq!(client.client, "C1");
        assert_eq!(client.total_items, 1);
        let details = &client.cities[0].boxes[0];
        assert_eq!(details.box_no, "5");
        assert_eq!(details.items_count, 1);
        assert_eq!(details.items[0].uuid, id);
    }
}

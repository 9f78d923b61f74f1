use tracing::info;
use uuid::Uuid;

use scantrail_domain::ports::EventStore;
use scantrail_domain::value_objects::{box_client, EventType};
use scantrail_domain::{
    current_millis, BulkRemoveRequest, RemoveItemRequest, RemoveResponse, StoredEvent,
    DASHBOARD_SOURCE,
};

use crate::{AppError, AppState};

const MAX_BULK_IDS: usize = 1000;

/// Logical removal: nothing is deleted, a `REMOVE` audit event is
/// appended so downstream views see the annotation as just another
/// event in the log.
pub async fn remove_item(
    state: &AppState,
    request: RemoveItemRequest,
) -> Result<RemoveResponse, AppError> {
    let operator = required(&request.operator, "operator")?;
    let box_ref = required(&request.box_ref, "box")?;
    let code = required(&request.code, "code")?;

    let now_ms = current_millis();
    let client = box_client(&box_ref);
    let audit = StoredEvent {
        id: Uuid::new_v4(),
        event_time_ms: now_ms,
        event_type: EventType::Remove.as_str().to_string(),
        operator,
        client: if client.is_empty() { None } else { Some(client) },
        city: None,
        box_ref: Some(box_ref.clone()),
        code: Some(code.clone()),
        details: Some(
            request
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Removed via dashboard".to_string()),
        ),
        received_at_ms: now_ms,
        source: DASHBOARD_SOURCE.to_string(),
        created_at_ms: now_ms,
    };

    state
        .event_store
        .insert_events(&[audit])
        .await
        .map_err(AppError::Internal)?;
    state.metrics.record_remove_audit();
    info!("item removed: box={}, code={}", box_ref, code);

    Ok(RemoveResponse {
        ok: true,
        message: format!("item {} removed from box {}", code, box_ref),
        removed_count: 1,
    })
}

/// Physical removal by identifier set, audited with one `BULK_REMOVE`
/// event carrying the count actually deleted. Matching nothing is a
/// zero-effect success and appends no audit.
pub async fn bulk_remove(
    state: &AppState,
    request: BulkRemoveRequest,
) -> Result<RemoveResponse, AppError> {
    let operator = required(&request.operator, "operator")?;
    if request.uuids.is_empty() {
        return Err(AppError::BadRequest("uuids must not be empty".to_string()));
    }
    if request.uuids.len() > MAX_BULK_IDS {
        return Err(AppError::BadRequest(format!(
            "at most {} uuids per call",
            MAX_BULK_IDS
        )));
    }

    let removed = state
        .event_store
        .delete_by_ids(&request.uuids)
        .await
        .map_err(AppError::Internal)?;
    if removed == 0 {
        return Ok(RemoveResponse {
            ok: false,
            message: "no events matched the supplied identifiers".to_string(),
            removed_count: 0,
        });
    }

    let now_ms = current_millis();
    let audit = StoredEvent {
        id: Uuid::new_v4(),
        event_time_ms: now_ms,
        event_type: EventType::BulkRemove.as_str().to_string(),
        operator,
        client: None,
        city: None,
        box_ref: None,
        code: Some(format!("Removed {} events", removed)),
        details: Some(
            request
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Bulk removal via dashboard".to_string()),
        ),
        received_at_ms: now_ms,
        source: DASHBOARD_SOURCE.to_string(),
        created_at_ms: now_ms,
    };
    state
        .event_store
        .insert_events(&[audit])
        .await
        .map_err(AppError::Internal)?;
    state.metrics.record_bulk_removed(removed);
    info!("bulk removed {} events", removed);

    Ok(RemoveResponse {
        ok: true,
        message: format!("removed {} events", removed),
        removed_count: removed,
    })
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_event, test_state, MemoryEventStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn remove_item_appends_audit_without_deleting() {
        let store = Arc::new(MemoryEventStore::default());
        store.seed(vec![seed_event("ITEM", "alice", "C1/5", 0)]);
        let state = test_state(store.clone());

        let response = remove_item(
            &state,
            RemoveItemRequest {
                operator: "boss".to_string(),
                box_ref: "C1/5".to_string(),
                code: "4600000000017".to_string(),
                reason: None,
            },
        )
        .await
        .expect("remove");

        assert!(response.ok);
        assert_eq!(store.len(), 2);
        let audit = store.events().last().cloned().expect("audit");
        assert_eq!(audit.event_type, "REMOVE");
        assert_eq!(audit.client.as_deref(), Some("C1"));
        assert_eq!(audit.source, "dashboard");
        assert_eq!(audit.details.as_deref(), Some("Removed via dashboard"));
    }

    #[tokio::test]
    async fn bulk_remove_deletes_and_audits_actual_count() {
        let store = Arc::new(MemoryEventStore::default());
        let kept = seed_event("ITEM", "alice", "C1/5", 0);
        let doomed_a = seed_event("ITEM", "alice", "C1/5", 1);
        let doomed_b = seed_event("ITEM", "bob", "C1/6", 2);
        store.seed(vec![kept.clone(), doomed_a.clone(), doomed_b.clone()]);
        let state = test_state(store.clone());

        let response = bulk_remove(
            &state,
            BulkRemoveRequest {
                operator: "boss".to_string(),
                // one id matches nothing; the count reflects actual deletions
                uuids: vec![doomed_a.id, doomed_b.id, Uuid::new_v4()],
                reason: Some("damaged".to_string()),
            },
        )
        .await
        .expect("bulk remove");

        assert!(response.ok);
        assert_eq!(response.removed_count, 2);
        let events = store.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| e.id == kept.id));
        let audit = events.iter().find(|e| e.event_type == "BULK_REMOVE").expect("audit");
        assert_eq!(audit.code.as_deref(), Some("Removed 2 events"));
        assert_eq!(audit.details.as_deref(), Some("damaged"));
    }

    #[tokio::test]
    async fn bulk_remove_noop_is_unaudited() {
        let store = Arc::new(MemoryEventStore::default());
        let survivor = seed_event("ITEM", "alice", "C1/5", 0);
        store.seed(vec![survivor.clone()]);
        let state = test_state(store.clone());

        let response = bulk_remove(
            &state,
            BulkRemoveRequest {
                operator: "boss".to_string(),
                uuids: vec![Uuid::new_v4()],
                reason: None,
            },
        )
        .await
        .expect("bulk remove");

        assert!(!response.ok);
        assert_eq!(response.removed_count, 0);
        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, survivor.id);
    }

    #[tokio::test]
    async fn bulk_remove_validates_input() {
        let store = Arc::new(MemoryEventStore::default());
        let state = test_state(store);

        let empty = bulk_remove(
            &state,
            BulkRemoveRequest {
                operator: "boss".to_string(),
                uuids: Vec::new(),
                reason: None,
            },
        )
        .await
        .expect_err("reject empty");
        assert!(matches!(empty, AppError::BadRequest(_)));

        let blank_operator = remove_item(
            &state,
            RemoveItemRequest {
                operator: " ".to_string(),
                box_ref: "C1/5".to_string(),
                code: "x".to_string(),
                reason: None,
            },
        )
        .await
        .expect_err("reject operator");
        assert!(matches!(blank_operator, AppError::BadRequest(_)));
    }
}

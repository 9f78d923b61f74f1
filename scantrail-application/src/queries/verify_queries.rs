use scantrail_domain::ports::EventStore;
use scantrail_domain::{VerifyRequest, VerifyResponse};

use crate::{AppError, AppState};

const MAX_VERIFY_IDS: usize = 1000;

/// Pre-flight existence check used by devices before sending a batch:
/// which of these identifiers does the store already hold.
pub async fn verify_present(
    state: &AppState,
    request: VerifyRequest,
) -> Result<VerifyResponse, AppError> {
    if request.uuids.is_empty() {
        return Err(AppError::BadRequest("uuids must not be empty".to_string()));
    }
    if request.uuids.len() > MAX_VERIFY_IDS {
        return Err(AppError::BadRequest(format!(
            "at most {} uuids per call",
            MAX_VERIFY_IDS
        )));
    }

    let existing = state
        .event_store
        .existing_ids(&request.uuids)
        .await
        .map_err(AppError::Internal)?;
    let mut present: Vec<_> = existing.into_iter().collect();
    present.sort();

    Ok(VerifyResponse { ok: true, present })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_event, test_state, MemoryEventStore};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn reports_only_known_identifiers() {
        let store = Arc::new(MemoryEventStore::default());
        let known = seed_event("ITEM", "alice", "C1/5", 0);
        store.seed(vec![known.clone()]);
        let state = test_state(store);

        let response = verify_present(
            &state,
            VerifyRequest {
                uuids: vec![known.id, Uuid::new_v4()],
            },
        )
        .await
        .expect("verify");
        assert_eq!(response.present, vec![known.id]);
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let store = Arc::new(MemoryEventStore::default());
        let state = test_state(store);
        let err = verify_present(&state, VerifyRequest { uuids: Vec::new() })
            .await
            .expect_err("reject");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

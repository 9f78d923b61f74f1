use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use scantrail_domain::ports::EventStore;
use scantrail_domain::services::deduplicator::{self, IngestRules};
use scantrail_domain::{current_millis, BatchRequest, BatchResponse};

use crate::{AppError, AppState};

/// Deduplicating batch ingestion. One batched existence check against
/// the store, classification in input order, one atomic insert of the
/// accepted subset. Repeating a batch is idempotent: everything already
/// present comes back in `duplicates` instead of being written again.
pub async fn process_batch(
    state: &AppState,
    request: BatchRequest,
) -> Result<BatchResponse, AppError> {
    let BatchRequest { mut events, source } = request;
    if events.is_empty() {
        return Err(AppError::BadRequest(
            "batch must contain at least one event".to_string(),
        ));
    }
    if events.len() > state.config.max_batch_size {
        return Err(AppError::BadRequest(format!(
            "batch size {} exceeds limit {}",
            events.len(),
            state.config.max_batch_size
        )));
    }
    if let Some(batch_source) = source {
        for event in &mut events {
            if event.source.is_none() {
                event.source = Some(batch_source.clone());
            }
        }
    }

    let candidate_ids: Vec<Uuid> = events.iter().filter_map(|event| event.uuid).collect();
    let existing = if candidate_ids.is_empty() {
        HashSet::new()
    } else {
        state
            .event_store
            .existing_ids(&candidate_ids)
            .await
            .map_err(AppError::Internal)?
    };

    let outcome = deduplicator::classify(
        events,
        &existing,
        current_millis(),
        IngestRules {
            future_skew_ms: state.config.ingest_future_skew_seconds * 1000,
        },
    );

    if !outcome.accepted.is_empty() {
        if let Err(err) = state.event_store.insert_events(&outcome.accepted).await {
            state.metrics.record_ingest_error();
            return Err(AppError::Internal(err));
        }
    }

    let inserted = outcome.accepted.len();
    let skipped = outcome.duplicates.len();
    info!(
        "ingested {} events, skipped {} duplicates, rejected {}",
        inserted,
        skipped,
        outcome.errors.len()
    );
    state
        .metrics
        .record_ingest(inserted, skipped, outcome.errors.len());

    Ok(BatchResponse {
        ok: true,
        inserted,
        skipped,
        duplicates: outcome.duplicates,
        errors: outcome.errors,
    })
}

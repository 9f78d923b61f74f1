use std::collections::HashSet;

use uuid::Uuid;

use crate::entities::{ScanEvent, StoredEvent, DEFAULT_SOURCE};

/// Classification result for one candidate batch. `accepted` preserves
/// the input order; `duplicates` lists ids already present in the store
/// or earlier in the same batch; `errors` carries one message per
/// candidate that failed validation and never reached classification.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub accepted: Vec<StoredEvent>,
    pub duplicates: Vec<Uuid>,
    pub errors: Vec<String>,
}

/// Validation bounds for candidate events.
#[derive(Debug, Clone, Copy)]
pub struct IngestRules {
    /// How far ahead of server time a device timestamp may run.
    pub future_skew_ms: i64,
}

/// Walk candidates in input order, validating each, assigning fresh
/// identifiers where absent and excluding every identifier that
/// collides with `existing` or with an earlier acceptance in the same
/// batch. Accepted events are stamped with `now_ms` as their receipt
/// time, so repeating a batch is idempotent: the second pass classifies
/// every previously accepted id as a duplicate.
pub fn classify(
    candidates: Vec<ScanEvent>,
    existing: &HashSet<Uuid>,
    now_ms: i64,
    rules: IngestRules,
) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();
    let mut seen: HashSet<Uuid> = existing.clone();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let ts = match validate(index, &candidate, now_ms, rules) {
            Ok(ts) => ts,
            Err(message) => {
                outcome.errors.push(message);
                continue;
            }
        };

        let id = candidate.uuid.unwrap_or_else(Uuid::new_v4);
        if !seen.insert(id) {
            outcome.duplicates.push(id);
            continue;
        }

        outcome.accepted.push(StoredEvent {
            id,
            event_time_ms: ts,
            event_type: candidate.event_type,
            operator: candidate.operator,
            client: candidate.client,
            city: candidate.city,
            box_ref: candidate.box_ref,
            code: candidate.code,
            details: candidate.details,
            received_at_ms: now_ms,
            source: candidate
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            created_at_ms: now_ms,
        });
    }

    outcome
}

fn validate(
    index: usize,
    candidate: &ScanEvent,
    now_ms: i64,
    rules: IngestRules,
) -> Result<i64, String> {
    if candidate.operator.trim().is_empty() {
        return Err(format!("event[{}]: operator is required", index));
    }
    if candidate.event_type.trim().is_empty() {
        return Err(format!("event[{}]: type is required", index));
    }
    let ts = candidate
        .ts
        .ok_or_else(|| format!("event[{}]: ts is required", index))?;
    if ts < 0 {
        return Err(format!("event[{}]: ts must not be negative", index));
    }
    if ts > now_ms + rules.future_skew_ms {
        return Err(format!("event[{}]: ts is in the future", index));
    }
    Ok(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const RULES: IngestRules = IngestRules {
        future_skew_ms: 60_000,
    };

    fn candidate(id: Option<Uuid>, ts: i64) -> ScanEvent {
        ScanEvent {
            uuid: id,
            ts: Some(ts),
            event_type: "ITEM".to_string(),
            operator: "alice".to_string(),
            client: Some("ACME".to_string()),
            city: None,
            box_ref: Some("ACME/5".to_string()),
            code: Some("4600000000017".to_string()),
            details: None,
            source: None,
        }
    }

    #[test]
    fn accepts_fresh_events_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let outcome = classify(
            vec![candidate(Some(a), NOW - 10), candidate(Some(b), NOW - 5)],
            &HashSet::new(),
            NOW,
            RULES,
        );
        assert_eq!(outcome.errors, Vec::<String>::new());
        assert!(outcome.duplicates.is_empty());
        let ids: Vec<Uuid> = outcome.accepted.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(outcome.accepted.iter().all(|e| e.received_at_ms == NOW));
    }

    #[test]
    fn generates_identifier_when_absent() {
        let outcome = classify(vec![candidate(None, NOW)], &HashSet::new(), NOW, RULES);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(!outcome.accepted[0].id.is_nil());
    }

    #[test]
    fn store_collision_is_a_duplicate() {
        let id = Uuid::new_v4();
        let existing: HashSet<Uuid> = [id].into_iter().collect();
        let outcome = classify(vec![candidate(Some(id), NOW)], &existing, NOW, RULES);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.duplicates, vec![id]);
    }

    #[test]
    fn same_identifier_twice_in_one_batch() {
        let id = Uuid::new_v4();
        let outcome = classify(
            vec![candidate(Some(id), NOW), candidate(Some(id), NOW)],
            &HashSet::new(),
            NOW,
            RULES,
        );
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.duplicates, vec![id]);
    }

    #[test]
    fn reclassifying_accepted_batch_is_idempotent() {
        let batch: Vec<ScanEvent> = (0..4).map(|i| candidate(Some(Uuid::new_v4()), NOW - i)).collect();
        let first = classify(batch.clone(), &HashSet::new(), NOW, RULES);
        assert_eq!(first.accepted.len(), 4);

        let stored: HashSet<Uuid> = first.accepted.iter().map(|e| e.id).collect();
        let second = classify(batch, &stored, NOW, RULES);
        assert!(second.accepted.is_empty());
        assert_eq!(second.duplicates.len(), 4);
    }

    #[test]
    fn rejects_future_timestamp_past_skew() {
        let within = classify(
            vec![candidate(None, NOW + 60_000)],
            &HashSet::new(),
            NOW,
            RULES,
        );
        assert_eq!(within.accepted.len(), 1);

        let beyond = classify(
            vec![candidate(None, NOW + 60_001)],
            &HashSet::new(),
            NOW,
            RULES,
        );
        assert!(beyond.accepted.is_empty());
        assert_eq!(beyond.errors.len(), 1);
        assert!(beyond.errors[0].contains("future"));
    }

    #[test]
    fn rejects_missing_required_fields_per_item() {
        let mut no_operator = candidate(None, NOW);
        no_operator.operator = "  ".to_string();
        let mut no_ts = candidate(None, NOW);
        no_ts.ts = None;
        let good = candidate(None, NOW);

        let outcome = classify(vec![no_operator, no_ts, good], &HashSet::new(), NOW, RULES);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("event[0]"));
        assert!(outcome.errors[1].contains("event[1]"));
    }

    #[test]
    fn blank_source_defaults_to_pwa() {
        let mut event = candidate(None, NOW);
        event.source = Some("".to_string());
        let outcome = classify(vec![event], &HashSet::new(), NOW, RULES);
        assert_eq!(outcome.accepted[0].source, "pwa");
    }
}

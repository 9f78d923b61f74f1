use std::collections::{BTreeSet, HashMap, HashSet};

use uuid::Uuid;

use crate::entities::{
    ClientStats, DashboardSnapshot, FeedEvent, OperatorStats, StoredEvent, Summary,
};
use crate::utils::format_millis;
use crate::value_objects::{box_number, EventType, MISSING_LABEL};

/// The live feed never carries more than this many events.
pub const FEED_LIMIT: usize = 100;

#[derive(Default)]
struct OperatorAccum<'a> {
    last_event: Option<&'a StoredEvent>,
    items: HashSet<Uuid>,
    errors: usize,
}

/// Compute the dashboard snapshot over one queried window. Item counts
/// collapse to distinct identifiers (a re-synced scan counts once);
/// client counters stay verbatim event counts. An operator is online
/// when their latest receipt is at most `online_threshold_secs` old.
pub fn summarize(
    events: &[StoredEvent],
    now_ms: i64,
    online_threshold_secs: i64,
) -> DashboardSnapshot {
    let mut by_operator: HashMap<&str, OperatorAccum> = HashMap::new();
    for event in events {
        let key = non_blank(&event.operator).unwrap_or(MISSING_LABEL);
        let accum = by_operator.entry(key).or_default();
        match accum.last_event {
            Some(last) if event.received_at_ms <= last.received_at_ms => {}
            _ => accum.last_event = Some(event),
        }
        match EventType::from(event.event_type.as_str()) {
            EventType::Item => {
                accum.items.insert(event.id);
            }
            EventType::Error => accum.errors += 1,
            _ => {}
        }
    }

    let mut operators: Vec<OperatorStats> = by_operator
        .into_iter()
        .filter_map(|(operator, accum)| {
            let last = accum.last_event?;
            let age_sec = (now_ms - last.received_at_ms) / 1000;
            Some(OperatorStats {
                operator: operator.to_string(),
                online: age_sec <= online_threshold_secs,
                online_age_sec: age_sec,
                last_seen_ms: last.received_at_ms,
                last_client: display(&last.client),
                last_city: display(&last.city),
                last_box: box_number(last.box_ref.as_deref().unwrap_or_default()),
                items_today: accum.items.len(),
                errors_today: accum.errors,
                last_seen_at: format_millis(last.received_at_ms),
            })
        })
        .collect();
    operators.sort_by(|a, b| {
        b.online
            .cmp(&a.online)
            .then(b.items_today.cmp(&a.items_today))
            .then(a.operator.cmp(&b.operator))
    });

    let mut by_client: HashMap<&str, ClientStats> = HashMap::new();
    for event in events {
        let key = non_blank_opt(&event.client).unwrap_or(MISSING_LABEL);
        let stats = by_client.entry(key).or_insert_with(|| ClientStats {
            client: key.to_string(),
            items: 0,
            boxes_open: 0,
            boxes_close: 0,
            errors: 0,
        });
        match EventType::from(event.event_type.as_str()) {
            EventType::Item => stats.items += 1,
            EventType::Box => stats.boxes_open += 1,
            EventType::Close => stats.boxes_close += 1,
            EventType::Error => stats.errors += 1,
            _ => {}
        }
    }
    let mut clients: Vec<ClientStats> = by_client.into_values().collect();
    clients.sort_by(|a, b| b.items.cmp(&a.items).then(a.client.cmp(&b.client)));

    let mut feed_events: Vec<&StoredEvent> = events.iter().collect();
    feed_events.sort_by(|a, b| b.received_at_ms.cmp(&a.received_at_ms));
    let feed: Vec<FeedEvent> = feed_events
        .into_iter()
        .take(FEED_LIMIT)
        .map(|event| FeedEvent {
            ts: format_millis(event.event_time_ms),
            operator: non_blank(&event.operator).unwrap_or(MISSING_LABEL).to_string(),
            event_type: event.event_type.clone(),
            client: display(&event.client),
            city: display(&event.city),
            box_no: box_number(event.box_ref.as_deref().unwrap_or_default()),
            code: event.code.clone().unwrap_or_default(),
        })
        .collect();

    let mut item_ids: HashSet<Uuid> = HashSet::new();
    let mut summary = Summary {
        items: 0,
        opens: 0,
        closes: 0,
        errors: 0,
    };
    for event in events {
        match EventType::from(event.event_type.as_str()) {
            EventType::Item => {
                item_ids.insert(event.id);
            }
            EventType::Box => summary.opens += 1,
            EventType::Close => summary.closes += 1,
            EventType::Error => summary.errors += 1,
            _ => {}
        }
    }
    summary.items = item_ids.len();

    DashboardSnapshot {
        operators,
        clients,
        feed,
        summary,
        operators_list: distinct(events.iter().map(|e| non_blank(&e.operator))),
        clients_list: distinct(events.iter().map(|e| non_blank_opt(&e.client))),
        cities_list: distinct(events.iter().map(|e| non_blank_opt(&e.city))),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_blank_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(non_blank)
}

fn display(value: &Option<String>) -> String {
    non_blank_opt(value).unwrap_or(MISSING_LABEL).to_string()
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let set: BTreeSet<&str> = values.flatten().collect();
    set.into_iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const THRESHOLD: i64 = 300;

    fn event(
        event_type: &str,
        operator: &str,
        client: Option<&str>,
        received_at_ms: i64,
    ) -> StoredEvent {
        StoredEvent {
            id: Uuid::new_v4(),
            event_time_ms: received_at_ms,
            event_type: event_type.to_string(),
            operator: operator.to_string(),
            client: client.map(ToString::to_string),
            city: Some("Moscow".to_string()),
            box_ref: Some("ACME/5".to_string()),
            code: Some("123".to_string()),
            details: None,
            received_at_ms,
            source: "pwa".to_string(),
            created_at_ms: received_at_ms,
        }
    }

    #[test]
    fn online_exactly_at_threshold() {
        let events = vec![event("ITEM", "alice", Some("ACME"), NOW - THRESHOLD * 1000)];
        let snapshot = summarize(&events, NOW, THRESHOLD);
        assert!(snapshot.operators[0].online);
        assert_eq!(snapshot.operators[0].online_age_sec, THRESHOLD);
    }

    #[test]
    fn offline_one_second_past_threshold() {
        let events = vec![event("ITEM", "bob", Some("ACME"), NOW - 400_000)];
        let snapshot = summarize(&events, NOW, THRESHOLD);
        assert!(!snapshot.operators[0].online);
        assert_eq!(snapshot.operators[0].online_age_sec, 400);
    }

    #[test]
    fn item_count_collapses_to_distinct_ids() {
        let first = event("ITEM", "alice", Some("ACME"), NOW);
        let mut resync = first.clone();
        resync.received_at_ms = NOW + 1;
        let events = vec![first, resync, event("ITEM", "alice", Some("ACME"), NOW)];

        let snapshot = summarize(&events, NOW + 2, THRESHOLD);
        assert_eq!(snapshot.operators[0].items_today, 2);
        assert_eq!(snapshot.summary.items, 2);
        // client counters stay verbatim
        assert_eq!(snapshot.clients[0].items, 3);
    }

    #[test]
    fn operator_sort_online_first_then_items() {
        let mut events = vec![
            event("ITEM", "offline_busy", Some("ACME"), NOW - 400_000),
            event("ITEM", "online_one", Some("ACME"), NOW),
        ];
        events.push(event("ITEM", "online_two", Some("ACME"), NOW));
        events.push(event("ITEM", "online_two", Some("ACME"), NOW));
        events.push(event("ITEM", "offline_busy", Some("ACME"), NOW - 400_000));

        let snapshot = summarize(&events, NOW, THRESHOLD);
        let names: Vec<&str> = snapshot
            .operators
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(names, vec!["online_two", "online_one", "offline_busy"]);
    }

    #[test]
    fn last_event_tracks_latest_receipt() {
        let mut older = event("ITEM", "alice", Some("ACME"), NOW - 50_000);
        older.box_ref = Some("ACME/1".to_string());
        let mut newer = event("BOX", "alice", Some("OTHER"), NOW - 1_000);
        newer.box_ref = Some("OTHER/9".to_string());

        let snapshot = summarize(&[older, newer], NOW, THRESHOLD);
        let op = &snapshot.operators[0];
        assert_eq!(op.last_client, "OTHER");
        assert_eq!(op.last_box, "9");
        assert_eq!(op.last_seen_ms, NOW - 1_000);
    }

    #[test]
    fn feed_is_receipt_ordered_and_truncated() {
        let events: Vec<StoredEvent> = (0..150)
            .map(|i| event("ITEM", "alice", Some("ACME"), NOW - i * 1000))
            .collect();
        let snapshot = summarize(&events, NOW, THRESHOLD);
        assert_eq!(snapshot.feed.len(), FEED_LIMIT);
        assert_eq!(snapshot.feed[0].ts, format_millis(NOW));
    }

    #[test]
    fn missing_attributes_bucket_under_sentinel() {
        let mut anonymous = event("ITEM", "", None, NOW);
        anonymous.city = None;
        anonymous.box_ref = None;
        let snapshot = summarize(&[anonymous], NOW, THRESHOLD);
        assert_eq!(snapshot.operators[0].operator, MISSING_LABEL);
        assert_eq!(snapshot.clients[0].client, MISSING_LABEL);
        assert_eq!(snapshot.feed[0].box_no, MISSING_LABEL);
        assert!(snapshot.operators_list.is_empty());
        assert!(snapshot.clients_list.is_empty());
    }

    #[test]
    fn filter_lists_are_sorted_and_distinct() {
        let events = vec![
            event("ITEM", "bob", Some("ZETA"), NOW),
            event("ITEM", "alice", Some("ACME"), NOW),
            event("ITEM", "bob", Some("ACME"), NOW),
        ];
        let snapshot = summarize(&events, NOW, THRESHOLD);
        assert_eq!(snapshot.operators_list, vec!["alice", "bob"]);
        assert_eq!(snapshot.clients_list, vec!["ACME", "ZETA"]);
        assert_eq!(snapshot.cities_list, vec!["Moscow"]);
    }

    #[test]
    fn unknown_types_feed_through_without_counting() {
        let events = vec![
            event("AUTO_CLOSE", "alice", Some("ACME"), NOW),
            event("ITEM", "alice", Some("ACME"), NOW - 1),
        ];
        let snapshot = summarize(&events, NOW, THRESHOLD);
        assert_eq!(snapshot.summary.items, 1);
        assert_eq!(snapshot.summary.opens, 0);
        assert_eq!(snapshot.feed[0].event_type, "AUTO_CLOSE");
    }
}

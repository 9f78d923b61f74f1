use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::entities::{BoxDetails, BoxItem, CityBoxes, ClientBoxes, StoredEvent};
use crate::utils::format_millis;
use crate::value_objects::{box_number, EventType, MISSING_LABEL};

#[derive(Default)]
struct BoxAccum {
    items: HashMap<Uuid, ItemAccum>,
    first_ms: Option<i64>,
    last_ms: Option<i64>,
    operators: BTreeSet<String>,
}

struct ItemAccum {
    ts_ms: i64,
    code: String,
    operator: String,
}

/// Build the client -> city -> box tree over one queried window. Leaf
/// grouping key is `(client, city, box number)`; items deduplicate by
/// identifier keeping the earliest scan, while activity bounds and the
/// operator set cover every event of the box regardless of type.
pub fn build_hierarchy(events: &[StoredEvent]) -> Vec<ClientBoxes> {
    let mut by_box: HashMap<(String, String, String), BoxAccum> = HashMap::new();

    for event in events {
        let client = label(event.client.as_deref());
        let city = label(event.city.as_deref());
        let box_no = box_number(event.box_ref.as_deref().unwrap_or_default());
        let accum = by_box.entry((client, city, box_no)).or_default();

        if EventType::from(event.event_type.as_str()) == EventType::Item {
            accum
                .items
                .entry(event.id)
                .and_modify(|item| {
                    if event.event_time_ms < item.ts_ms {
                        item.ts_ms = event.event_time_ms;
                        item.code = event.code.clone().unwrap_or_default();
                        item.operator = event.operator.clone();
                    }
                })
                .or_insert_with(|| ItemAccum {
                    ts_ms: event.event_time_ms,
                    code: event.code.clone().unwrap_or_default(),
                    operator: event.operator.clone(),
                });
        }

        accum.first_ms = Some(match accum.first_ms {
            Some(first) => first.min(event.event_time_ms),
            None => event.event_time_ms,
        });
        accum.last_ms = Some(match accum.last_ms {
            Some(last) => last.max(event.event_time_ms),
            None => event.event_time_ms,
        });
        if !event.operator.trim().is_empty() {
            accum.operators.insert(event.operator.clone());
        }
    }

    let mut by_client: HashMap<String, HashMap<String, Vec<BoxDetails>>> = HashMap::new();
    for ((client, city, box_no), accum) in by_box {
        let mut items: Vec<BoxItem> = accum
            .items
            .into_iter()
            .map(|(id, item)| BoxItem {
                ts: format_millis(item.ts_ms),
                ts_ms: item.ts_ms,
                code: item.code,
                operator: item.operator,
                uuid: id,
            })
            .collect();
        items.sort_by(|a, b| a.ts_ms.cmp(&b.ts_ms).then(a.uuid.cmp(&b.uuid)));

        let details = BoxDetails {
            client: client.clone(),
            city: city.clone(),
            box_no,
            items_count: items.len(),
            first_at: accum.first_ms.map(format_millis).unwrap_or_default(),
            last_at: accum.last_ms.map(format_millis).unwrap_or_default(),
            operators: accum.operators.into_iter().collect(),
            items,
        };
        by_client
            .entry(client)
            .or_default()
            .entry(city)
            .or_default()
            .push(details);
    }

    let mut clients: Vec<ClientBoxes> = by_client
        .into_iter()
        .map(|(client, cities_map)| {
            let mut cities: Vec<CityBoxes> = cities_map
                .into_iter()
                .map(|(city, mut boxes)| {
                    boxes.sort_by(|a, b| {
                        b.items_count
                            .cmp(&a.items_count)
                            .then(a.box_no.cmp(&b.box_no))
                    });
                    CityBoxes {
                        city,
                        total_items: boxes.iter().map(|b| b.items_count).sum(),
                        total_boxes: boxes.len(),
                        boxes,
                    }
                })
                .collect();
            cities.sort_by(|a, b| {
                b.total_items
                    .cmp(&a.total_items)
                    .then(a.city.cmp(&b.city))
            });
            ClientBoxes {
                client,
                total_items: cities.iter().map(|c| c.total_items).sum(),
                total_boxes: cities.iter().map(|c| c.total_boxes).sum(),
                cities,
            }
        })
        .collect();
    clients.sort_by(|a, b| {
        b.total_items
            .cmp(&a.total_items)
            .then(a.client.cmp(&b.client))
    });
    clients
}

fn label(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => MISSING_LABEL.to_string(),
    }
}

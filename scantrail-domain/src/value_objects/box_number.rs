// Box number value object
// Boxes follow the `<client>/<number>` convention; views display only
// the number part.

/// Display value for a missing operator, client, city or box.
pub const MISSING_LABEL: &str = "—";

/// Extract the display box number: the part after the first `/`, the
/// raw value when there is no separator, the sentinel when empty.
pub fn box_number(box_ref: &str) -> String {
    if box_ref.is_empty() {
        return MISSING_LABEL.to_string();
    }
    match box_ref.split_once('/') {
        Some((_, number)) => number.to_string(),
        None => box_ref.to_string(),
    }
}

/// Client prefix of a `<client>/<number>` box reference, empty when the
/// reference carries no separator.
pub fn box_client(box_ref: &str) -> String {
    match box_ref.split_once('/') {
        Some((client, _)) => client.to_string(),
        None => String::new(),
    }
}

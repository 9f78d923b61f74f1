// Event type value object
// The wire tag is an open string; only the known values below drive
// specialized counters, everything else passes through untouched.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Item,
    Box,
    Close,
    City,
    CityClose,
    Error,
    Remove,
    BulkRemove,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Item => "ITEM",
            EventType::Box => "BOX",
            EventType::Close => "CLOSE",
            EventType::City => "CITY",
            EventType::CityClose => "CITY_CLOSE",
            EventType::Error => "ERROR",
            EventType::Remove => "REMOVE",
            EventType::BulkRemove => "BULK_REMOVE",
            EventType::Other => "OTHER",
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "ITEM" => EventType::Item,
            "BOX" => EventType::Box,
            "CLOSE" => EventType::Close,
            "CITY" => EventType::City,
            "CITY_CLOSE" => EventType::CityClose,
            "ERROR" => EventType::Error,
            "REMOVE" => EventType::Remove,
            "BULK_REMOVE" => EventType::BulkRemove,
            _ => EventType::Other,
        }
    }
}

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, TimeZone, Utc};

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Display format used across dashboard, logs and exports.
pub fn format_millis(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt.format("%d.%m.%Y %H:%M:%S").to_string(),
        _ => String::new(),
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| anyhow!("invalid date '{}': {}", date, err))
}

/// Inclusive day-bounded window in unix milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Resolve a `[date, date_end]` pair into day bounds. A missing end
/// falls back to the start day; a missing start means today for both
/// bounds; a reversed pair is swapped rather than rejected.
pub fn day_range(date: Option<&str>, date_end: Option<&str>) -> Result<DayRange> {
    let (start_date, end_date) = match date {
        None => {
            let today = today();
            (today, today)
        }
        Some(start) => {
            let start = parse_date(start)?;
            let end = match date_end {
                Some(end) => parse_date(end)?,
                None => start,
            };
            (start, end)
        }
    };
    let (start_date, end_date) = if start_date > end_date {
        (end_date, start_date)
    } else {
        (start_date, end_date)
    };
    Ok(DayRange {
        start_ms: day_start_ms(start_date),
        end_ms: day_end_ms(end_date),
    })
}

fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

fn day_end_ms(date: NaiveDate) -> i64 {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

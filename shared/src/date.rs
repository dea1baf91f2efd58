//! Date display.
//!
//! The backend sends ISO-8601 strings (`2024-05-01T10:22:31.123456+00:00`) or
//! bare dates (`2024-05-01`). These helpers turn them into display text without
//! ever failing: unparseable input is shown as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%d %b %Y";
const DATE_TIME_FORMAT: &str = "%d %b %Y, %H:%M";

enum Parsed {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

fn parse(value: &str) -> Option<Parsed> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Parsed::DateTime(dt.naive_local()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Parsed::DateTime(dt));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(Parsed::Date)
}

/// `01 May 2024`, `-` when missing.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return "-".to_string();
    };
    match parse(raw) {
        Some(Parsed::Date(d)) => d.format(DATE_FORMAT).to_string(),
        Some(Parsed::DateTime(dt)) => dt.format(DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `01 May 2024, 10:22`, `-` when missing.
pub fn format_date_time(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return "-".to_string();
    };
    match parse(raw) {
        Some(Parsed::Date(d)) => d.format(DATE_FORMAT).to_string(),
        Some(Parsed::DateTime(dt)) => dt.format(DATE_TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Review timestamps read `Recently` when absent or unparseable.
pub fn format_review_date(value: Option<&str>) -> String {
    match value.and_then(parse) {
        Some(Parsed::Date(d)) => d.format(DATE_FORMAT).to_string(),
        Some(Parsed::DateTime(dt)) => dt.format(DATE_FORMAT).to_string(),
        None => "Recently".to_string(),
    }
}

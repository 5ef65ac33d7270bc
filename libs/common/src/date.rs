//! Date rendering for review cards

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date: {0}")]
pub struct DateError(pub String);

/// Render a backend timestamp as `dd.mm.yyyy`.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive ISO date-times as
/// produced by the backend, and plain `yyyy-mm-dd` dates.
pub fn format_date(value: &str) -> Result<String, DateError> {
    parse_date(value)
        .map(|date| date.format("%d.%m.%Y").to_string())
        .ok_or_else(|| DateError(value.to_string()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

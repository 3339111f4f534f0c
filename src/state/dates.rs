/// Conversions between the service's ISO timestamps and the
/// calendar dates shown in the form and on cards.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    Invalid(String),
}

/// Calendar-date portion of a timestamp ("2024-05-01T10:30:00" -> "2024-05-01")
pub fn date_portion(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Turn a "YYYY-MM-DD" input into a UTC midnight timestamp
/// with millisecond precision, e.g. "2024-05-01T00:00:00.000Z"
pub fn to_iso_timestamp(date: &str) -> Result<String, DateError> {
    let day = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| DateError::Invalid(date.to_string()))?;
    let midnight = day.and_time(NaiveTime::MIN).and_utc();
    Ok(midnight.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Format a service timestamp for display (M/D/YYYY).
///
/// Offset-carrying timestamps are shown in local time; naive ones as-is.
pub fn format_display_date(timestamp: &str) -> String {
    match parse_calendar_date(timestamp) {
        Some(day) => day.format("%-m/%-d/%Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn parse_calendar_date(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(with_offset.with_timezone(&Local).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(timestamp, DATE_FORMAT).ok()
}

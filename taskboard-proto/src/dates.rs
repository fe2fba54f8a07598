//! Due-date parsing and formatting.
//!
//! Due dates are stored as entered. Anything that reads as a calendar date
//! is accepted: a plain `YYYY-MM-DD`, an RFC 3339 timestamp, or a local
//! `YYYY-MM-DDTHH:MM[:SS]` value as produced by datetime inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used by date inputs.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a due date, returning `None` when it is empty or not a valid date.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc().date())
        })
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
                .into_iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Formats a stored due date for a date input.
///
/// Returns the empty string when there is no date or it cannot be parsed,
/// which leaves the input blank.
#[must_use]
pub fn format_for_input(raw: Option<&str>) -> String {
    raw.and_then(parse_due_date)
        .map(|d| d.format(INPUT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

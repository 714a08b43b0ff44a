//! Derived record metadata and the hidden-entry conventions.
//!
//! ## Reading time
//!
//! `ceil(words / words_per_minute)`, where words are whitespace-separated
//! tokens of the body. Any non-empty body reads in at least one minute; an
//! empty body reads in zero.
//!
//! ## Sort dates
//!
//! Records are ordered by their `date` header. Authored dates are kept
//! verbatim on the record; for ordering they are parsed leniently:
//!
//! - `2024-03-01` (plain date)
//! - `2024-03-01T10:00:00Z` / `2024-03-01T10:00:00+02:00` (RFC 3339, date part used)
//! - `2024-03-01T10:00:00` (naive date-time, date part used)
//!
//! A missing or unparseable date sorts as the configured default date.
//!
//! ## Hidden entries
//!
//! Two authoring conventions keep a drafted project off the site:
//!
//! - Wrap the whole file in an HTML comment. Any entry whose trimmed text
//!   starts with `<!--` is dropped before parsing.
//! - Put a marker phrase anywhere in the file (`HIDDEN PROJECT` and
//!   `DO NOT PUBLISH` by default). This catches files where the comment
//!   wrapper was lost or only partially applied.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Opening delimiter of an HTML comment.
pub const COMMENT_OPEN: &str = "<!--";

/// Minutes needed to read `body` at `words_per_minute`.
pub fn reading_time(body: &str, words_per_minute: usize) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(words_per_minute.max(1))
}

/// Parse an authored date for ordering. Returns `None` when unparseable.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// The date a record sorts by: its own if parseable, otherwise `default`.
pub fn sort_date(raw: Option<&str>, default: NaiveDate) -> NaiveDate {
    raw.and_then(parse_date).unwrap_or(default)
}

/// True when the whole entry is commented out. A leading BOM is ignored.
pub fn is_commented_out(raw: &str) -> bool {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    text.trim_start().starts_with(COMMENT_OPEN)
}

/// The first marker phrase found in `raw`, if any.
pub fn find_hidden_marker<'a>(raw: &str, markers: &'a [String]) -> Option<&'a str> {
    markers
        .iter()
        .map(String::as_str)
        .find(|m| !m.is_empty() && raw.contains(m))
}

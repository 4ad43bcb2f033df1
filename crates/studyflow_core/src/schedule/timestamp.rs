//! ISO-8601 timestamp parsing and due-date resolution.
//!
//! # Invariants
//! - A timestamp whose wall clock reads `00:00` in its own offset (for example
//!   `2025-11-20T00:00:00Z`, `2025-11-20T00:00:00.000Z` or
//!   `2025-11-20T00:00:30Z`) is a date-only value: its literal calendar date is
//!   used and it is never shifted by the local zone. Seconds are ignored.
//! - Any other instant is converted to the local zone before its date is taken.
//! - Parse failures are returned as [`TimestampError`]; they are never papered
//!   over with a guessed date.

use crate::schedule::zone::LocalZone;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("unparseable timestamp `{0}`")]
    Unparseable(String),
}

/// Parsed ISO-8601 value, keeping track of how much was specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// Date and time with an explicit offset.
    Instant(DateTime<FixedOffset>),
    /// Date and time without offset, read as local wall-clock time.
    Floating(NaiveDateTime),
    /// Bare `YYYY-MM-DD`.
    DateOnly(NaiveDate),
}

const FLOATING_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses RFC-3339 / ISO-8601 text.
pub fn parse_timestamp(raw: &str) -> Result<ParsedTimestamp, TimestampError> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ParsedTimestamp::Instant(instant));
    }
    for format in FLOATING_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ParsedTimestamp::Floating(naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(ParsedTimestamp::DateOnly(date));
    }
    Err(TimestampError::Unparseable(trimmed.to_string()))
}

/// Resolves a task `due` value to the calendar date it denotes locally.
pub fn resolve_due_date(raw: &str, zone: &LocalZone) -> Result<NaiveDate, TimestampError> {
    match parse_timestamp(raw)? {
        ParsedTimestamp::Instant(instant) if is_midnight_minute(&instant) => {
            Ok(instant.date_naive())
        }
        ParsedTimestamp::Instant(instant) => Ok(zone.to_local(&instant).date()),
        ParsedTimestamp::Floating(naive) => Ok(naive.date()),
        ParsedTimestamp::DateOnly(date) => Ok(date),
    }
}

fn is_midnight_minute(instant: &DateTime<FixedOffset>) -> bool {
    instant.hour() == 0 && instant.minute() == 0
}

/// Resolves an event boundary to local wall-clock time.
///
/// Date-only values resolve to local midnight.
pub fn resolve_local_datetime(
    raw: &str,
    zone: &LocalZone,
) -> Result<NaiveDateTime, TimestampError> {
    match parse_timestamp(raw)? {
        ParsedTimestamp::Instant(instant) => Ok(zone.to_local(&instant)),
        ParsedTimestamp::Floating(naive) => Ok(naive),
        ParsedTimestamp::DateOnly(date) => Ok(date.and_time(NaiveTime::MIN)),
    }
}

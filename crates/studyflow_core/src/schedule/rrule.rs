//! Minimal RRULE parsing and expansion.
//!
//! Supported subset:
//! - `RRULE:FREQ=WEEKLY;BYDAY=MO,FR[;INTERVAL=n]`
//! - `RRULE:FREQ=DAILY[;INTERVAL=n]`
//!
//! # Invariants
//! - The `RRULE:` prefix and parameter names are matched case-insensitively.
//! - Unknown `BYDAY` codes are skipped, never errors.
//! - `INTERVAL <= 0` is clamped to 1.
//! - Weekly expansion steps from the Monday on/before `window.start`, so
//!   `INTERVAL > 1` counts weeks from that anchor.
//! - Expanded dates are ascending, unique and inside the window.

use crate::model::window::TimeWindow;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;
use thiserror::Error;

const RRULE_PREFIX: &str = "RRULE:";

/// Reasons a rule string yields no expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("rule is not an RRULE")]
    NotAnRrule,
    #[error("rule has no FREQ parameter")]
    MissingFrequency,
    #[error("unsupported recurrence frequency `{0}`")]
    UnsupportedFrequency(String),
    #[error("weekly rule has no BYDAY parameter")]
    MissingByDay,
    #[error("invalid INTERVAL value `{0}`")]
    InvalidInterval(String),
}

/// Parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Weekdays sorted Monday-first, deduplicated.
    Weekly { weekdays: Vec<Weekday>, interval: u32 },
    Daily { interval: u32 },
}

impl RecurrenceRule {
    /// Parses one rule string.
    pub fn parse(raw: &str) -> Result<Self, RecurrenceError> {
        let upper = raw.trim().to_ascii_uppercase();
        let body = upper
            .strip_prefix(RRULE_PREFIX)
            .ok_or(RecurrenceError::NotAnRrule)?;
        let params = parse_params(body);

        let interval = parse_interval(params.get("INTERVAL").copied())?;
        match params.get("FREQ").copied() {
            None | Some("") => Err(RecurrenceError::MissingFrequency),
            Some("WEEKLY") => {
                let byday = params
                    .get("BYDAY")
                    .copied()
                    .ok_or(RecurrenceError::MissingByDay)?;
                Ok(Self::Weekly {
                    weekdays: parse_weekdays(byday),
                    interval,
                })
            }
            Some("DAILY") => Ok(Self::Daily { interval }),
            Some(other) => Err(RecurrenceError::UnsupportedFrequency(other.to_string())),
        }
    }

    /// Expands the rule into concrete dates within `window`.
    pub fn expand(&self, window: &TimeWindow) -> Vec<NaiveDate> {
        match self {
            Self::Weekly { weekdays, interval } => expand_weekly(weekdays, *interval, window),
            Self::Daily { interval } => expand_daily(*interval, window),
        }
    }
}

fn parse_params(body: &str) -> BTreeMap<&str, &str> {
    body.split(';')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.trim(), value.trim()))
        })
        .collect()
}

fn parse_interval(raw: Option<&str>) -> Result<u32, RecurrenceError> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(1);
    };
    let value = raw
        .parse::<i64>()
        .map_err(|_| RecurrenceError::InvalidInterval(raw.to_string()))?;
    Ok(u32::try_from(value.max(1)).unwrap_or(u32::MAX))
}

fn parse_weekdays(byday: &str) -> Vec<Weekday> {
    let mut weekdays = byday
        .split(',')
        .filter_map(|code| weekday_from_code(code.trim()))
        .collect::<Vec<_>>();
    weekdays.sort_by_key(|day| day.num_days_from_monday());
    weekdays.dedup();
    weekdays
}

fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

fn expand_weekly(weekdays: &[Weekday], interval: u32, window: &TimeWindow) -> Vec<NaiveDate> {
    if weekdays.is_empty() {
        return Vec::new();
    }
    let step = Days::new(7 * u64::from(interval.max(1)));
    let back_to_monday = Days::new(u64::from(window.start().weekday().num_days_from_monday()));
    let Some(mut anchor) = window.start().checked_sub_days(back_to_monday) else {
        return Vec::new();
    };

    let mut dates = Vec::new();
    while anchor <= window.end() {
        for weekday in weekdays {
            let offset = Days::new(u64::from(weekday.num_days_from_monday()));
            if let Some(date) = anchor.checked_add_days(offset) {
                if window.contains(date) {
                    dates.push(date);
                }
            }
        }
        match anchor.checked_add_days(step) {
            Some(next) => anchor = next,
            None => break,
        }
    }
    dates
}

fn expand_daily(interval: u32, window: &TimeWindow) -> Vec<NaiveDate> {
    let step = Days::new(u64::from(interval.max(1)));
    let mut dates = Vec::new();
    let mut current = window.start();
    while current <= window.end() {
        dates.push(current);
        match current.checked_add_days(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

//! Calendar event model.
//!
//! Raw events mirror the provider's `start`/`end` objects, where a timed event
//! carries `dateTime` and an all-day event carries `date`.

use serde::{Deserialize, Serialize};

/// One side (`start` or `end`) of a provider event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date_time: None,
            date: Some(date.into()),
        }
    }
}

/// Raw event record fetched from an external calendar provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(rename = "calendarId", default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

/// Canonical event emitted by the event normalizer.
///
/// `date` is `YYYY-MM-DD` (or empty when the start could not be read);
/// `start_time`/`end_time` are local `HH:MM` or empty for all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub description: String,
}

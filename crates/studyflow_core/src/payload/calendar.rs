//! Calendar event and task resource builders.

use crate::model::occurrence::UNTITLED;
use crate::payload::{PayloadError, PayloadResult};
use crate::schedule::zone::{to_utc_rfc3339, LocalZone};
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::{Deserialize, Serialize};

const UTC_ZONE_NAME: &str = "UTC";

/// Event draft as produced by the calendar agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Local `HH:MM`.
    pub start_time: String,
    /// Local `HH:MM`.
    pub end_time: String,
    /// Frequency word such as `weekly`; becomes `RRULE:FREQ=WEEKLY`.
    #[serde(default)]
    pub repeat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBoundary {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Provider event resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: EventBoundary,
    pub end: EventBoundary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence: Vec<String>,
}

/// Task draft as produced by the task agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Accepted alias of `due_date`.
    #[serde(default)]
    pub date: Option<String>,
}

/// Provider task resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

/// Builds an event resource from a draft, interpreting times in `zone`.
pub fn build_event_payload(draft: &EventDraft, zone: &LocalZone) -> PayloadResult<EventPayload> {
    let date = parse_date("date", &draft.date)?;
    let start_time = parse_time("start_time", &draft.start_time)?;
    let end_time = parse_time("end_time", &draft.end_time)?;
    if end_time < start_time {
        return Err(PayloadError::EndBeforeStart {
            start: draft.start_time.trim().to_string(),
            end: draft.end_time.trim().to_string(),
        });
    }

    let start = zone.localize(date.and_time(start_time))?;
    let end = zone.localize(date.and_time(end_time))?;

    let recurrence = draft
        .repeat
        .as_deref()
        .map(str::trim)
        .filter(|repeat| !repeat.is_empty())
        .map(|repeat| vec![format!("RRULE:FREQ={}", repeat.to_ascii_uppercase())])
        .unwrap_or_default();

    Ok(EventPayload {
        summary: title_or_untitled(draft.title.as_deref()),
        description: draft.notes.clone().unwrap_or_default(),
        start: EventBoundary {
            date_time: to_utc_rfc3339(&start),
            time_zone: UTC_ZONE_NAME.to_string(),
        },
        end: EventBoundary {
            date_time: to_utc_rfc3339(&end),
            time_zone: UTC_ZONE_NAME.to_string(),
        },
        recurrence,
    })
}

/// Builds a task resource; an unreadable due date yields a task without due.
pub fn build_task_payload(draft: &TaskDraft, zone: &LocalZone) -> PayloadResult<TaskPayload> {
    let notes = draft
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
        .map(str::to_string);

    let raw_due = draft
        .due_date
        .as_deref()
        .or(draft.date.as_deref())
        .map(str::trim)
        .filter(|due| !due.is_empty());
    let due = match raw_due.and_then(|due| NaiveDate::parse_from_str(due, "%Y-%m-%d").ok()) {
        Some(date) => {
            let local_midnight = zone.localize(date.and_time(NaiveTime::MIN))?;
            Some(local_midnight.to_rfc3339_opts(SecondsFormat::Secs, false))
        }
        None => None,
    };

    Ok(TaskPayload {
        title: title_or_untitled(draft.title.as_deref()),
        notes,
        due,
    })
}

fn title_or_untitled(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

fn parse_date(field: &'static str, raw: &str) -> PayloadResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| PayloadError::InvalidField {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_time(field: &'static str, raw: &str) -> PayloadResult<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| PayloadError::InvalidField {
        field,
        value: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_event_payload, build_task_payload, EventDraft, TaskDraft};
    use crate::payload::PayloadError;
    use crate::schedule::zone::LocalZone;

    fn new_york() -> LocalZone {
        LocalZone::parse("America/New_York").unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft {
            title: Some("  Office hours ".to_string()),
            notes: Some("bring notebook".to_string()),
            date: "2025-11-20".to_string(),
            start_time: "14:00".to_string(),
            end_time: "15:30".to_string(),
            repeat: Some(" weekly ".to_string()),
        }
    }

    #[test]
    fn event_times_are_sent_as_utc() {
        let payload = build_event_payload(&draft(), &new_york()).unwrap();
        assert_eq!(payload.summary, "Office hours");
        assert_eq!(payload.start.date_time, "2025-11-20T19:00:00Z");
        assert_eq!(payload.end.date_time, "2025-11-20T20:30:00Z");
        assert_eq!(payload.start.time_zone, "UTC");
        assert_eq!(payload.recurrence, vec!["RRULE:FREQ=WEEKLY".to_string()]);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["start"]["dateTime"], "2025-11-20T19:00:00Z");
        assert_eq!(json["start"]["timeZone"], "UTC");
    }

    #[test]
    fn event_draft_errors() {
        let mut bad_time = draft();
        bad_time.start_time = "2pm".to_string();
        assert!(matches!(
            build_event_payload(&bad_time, &new_york()).unwrap_err(),
            PayloadError::InvalidField { field: "start_time", .. }
        ));

        let mut reversed = draft();
        reversed.end_time = "13:00".to_string();
        assert!(matches!(
            build_event_payload(&reversed, &new_york()).unwrap_err(),
            PayloadError::EndBeforeStart { .. }
        ));

        let mut no_date = draft();
        no_date.date = " ".to_string();
        assert_eq!(
            build_event_payload(&no_date, &new_york()).unwrap_err(),
            PayloadError::MissingField("date")
        );
    }

    #[test]
    fn task_due_is_local_midnight_with_offset() {
        let task = TaskDraft {
            title: None,
            notes: Some(String::new()),
            due_date: None,
            date: Some("2025-11-20".to_string()),
        };
        let payload = build_task_payload(&task, &new_york()).unwrap();
        assert_eq!(payload.title, "Untitled");
        assert_eq!(payload.notes, None);
        assert_eq!(payload.due.as_deref(), Some("2025-11-20T00:00:00-05:00"));
    }

    #[test]
    fn invalid_task_due_is_dropped() {
        let task = TaskDraft {
            title: Some("Essay".to_string()),
            due_date: Some("20/11/2025".to_string()),
            ..TaskDraft::default()
        };
        let payload = build_task_payload(&task, &new_york()).unwrap();
        assert_eq!(payload.due, None);
        assert!(!serde_json::to_value(&payload).unwrap().as_object().unwrap().contains_key("due"));
    }
}

//! Calendar event normalization.
//!
//! # Invariants
//! - Timed events are reported in the local zone (`date` + `HH:MM`).
//! - All-day events keep their literal date and have empty times.
//! - Events with neither form fall back to `today`.
//! - Output is sorted by `(date, start_time)`; equal keys keep input order.

use crate::model::event::{NormalizedEvent, RawEvent};
use crate::model::occurrence::UNTITLED;
use crate::schedule::timestamp::resolve_local_datetime;
use crate::schedule::zone::LocalZone;
use chrono::NaiveDate;
use log::debug;

const TIME_FORMAT: &str = "%H:%M";

/// Normalizes raw provider events into the client-facing event shape.
pub fn normalize_events(
    events: &[RawEvent],
    zone: &LocalZone,
    today: NaiveDate,
) -> Vec<NormalizedEvent> {
    let mut normalized = events
        .iter()
        .enumerate()
        .map(|(index, event)| normalize_one(index, event, zone, today))
        .collect::<Vec<_>>();
    normalized.sort_by(|left, right| {
        (&left.date, &left.start_time).cmp(&(&right.date, &right.start_time))
    });

    debug!(
        "event=events_normalized module=schedule status=ok events={} zone={}",
        normalized.len(),
        zone.label()
    );
    normalized
}

fn normalize_one(index: usize, event: &RawEvent, zone: &LocalZone, today: NaiveDate) -> NormalizedEvent {
    let mut date = String::new();
    let mut start_time = String::new();
    let mut end_time = String::new();

    if let Some(raw_start) = non_blank(event.start.date_time.as_deref()) {
        match resolve_local_datetime(raw_start, zone) {
            Ok(local) => {
                date = local.date().to_string();
                start_time = local.format(TIME_FORMAT).to_string();
                if let Some(raw_end) = non_blank(event.end.date_time.as_deref()) {
                    if let Ok(local_end) = resolve_local_datetime(raw_end, zone) {
                        end_time = local_end.format(TIME_FORMAT).to_string();
                    }
                }
            }
            Err(err) => debug!(
                "event=event_start_skipped module=schedule status=degraded event_index={index} error={err}"
            ),
        }
    } else if let Some(all_day) = non_blank(event.start.date.as_deref()) {
        date = match NaiveDate::parse_from_str(all_day, "%Y-%m-%d") {
            Ok(day) => day.to_string(),
            Err(_) => all_day.to_string(),
        };
    } else {
        date = today.to_string();
    }

    NormalizedEvent {
        title: non_blank(event.summary.as_deref())
            .unwrap_or(UNTITLED)
            .to_string(),
        date,
        start_time,
        end_time,
        location: event.location.clone().unwrap_or_default(),
        description: event.description.clone().unwrap_or_default(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::normalize_events;
    use crate::model::event::{EventTime, RawEvent};
    use crate::schedule::zone::LocalZone;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    #[test]
    fn timed_event_is_converted_to_local_clock() {
        let zone = LocalZone::parse("America/New_York").unwrap();
        let event = RawEvent {
            summary: Some("Lab".to_string()),
            start: EventTime::timed("2025-11-20T15:00:00Z"),
            end: EventTime::timed("2025-11-20T16:30:00Z"),
            ..RawEvent::default()
        };
        let out = normalize_events(&[event], &zone, today());
        assert_eq!(out[0].date, "2025-11-20");
        assert_eq!(out[0].start_time, "10:00");
        assert_eq!(out[0].end_time, "11:30");
    }

    #[test]
    fn all_day_and_unknown_shapes() {
        let zone = LocalZone::parse("UTC").unwrap();
        let all_day = RawEvent {
            summary: Some("Holiday".to_string()),
            start: EventTime::all_day("2025-11-27"),
            ..RawEvent::default()
        };
        let bare = RawEvent::default();
        let out = normalize_events(&[all_day, bare], &zone, today());
        assert_eq!(out[0].title, "Untitled");
        assert_eq!(out[0].date, "2025-11-20");
        assert_eq!(out[1].title, "Holiday");
        assert_eq!(out[1].date, "2025-11-27");
        assert!(out[1].start_time.is_empty());
        assert!(out[1].end_time.is_empty());
    }

    #[test]
    fn unparseable_start_leaves_date_empty_and_sorts_first() {
        let zone = LocalZone::parse("UTC").unwrap();
        let good = RawEvent {
            summary: Some("Seminar".to_string()),
            start: EventTime::timed("2025-11-21T09:00:00Z"),
            ..RawEvent::default()
        };
        let broken = RawEvent {
            summary: Some("Broken".to_string()),
            start: EventTime::timed("tomorrow-ish"),
            ..RawEvent::default()
        };
        let out = normalize_events(&[good, broken], &zone, today());
        assert_eq!(out[0].title, "Broken");
        assert!(out[0].date.is_empty());
        assert_eq!(out[1].start_time, "09:00");
    }
}

//! Task occurrence normalization.
//!
//! # Responsibility
//! - Resolve direct due dates and keep those inside the lookahead window.
//! - Keep undated tasks once, with an empty date.
//! - Expand recurrence rules into concrete dates inside the window.
//! - Merge, deduplicate by `(title, date)` and sort by `(date, title)`.
//!
//! # Invariants
//! - First-seen occurrence wins on `(title, date)` collisions; per source the
//!   direct due date is seen before its expansions.
//! - Undated occurrences sort first.
//! - Output is a pure function of `(sources, window, zone)`.
//! - Per-item failures (unparseable due date, unusable rule) never abort the
//!   batch; they only reduce output completeness.

use crate::model::occurrence::{DueField, NormalizedOccurrence, RawOccurrenceSource};
use crate::model::window::TimeWindow;
use crate::schedule::rrule::{RecurrenceError, RecurrenceRule};
use crate::schedule::timestamp::resolve_due_date;
use crate::schedule::zone::LocalZone;
use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;

/// Normalizes raw task records into sorted, deduplicated occurrences.
pub fn normalize(
    sources: &[RawOccurrenceSource],
    window: &TimeWindow,
    zone: &LocalZone,
) -> Vec<NormalizedOccurrence> {
    let mut collector = OccurrenceCollector::default();
    let mut unparseable_due = 0usize;
    let mut ignored_rules = 0usize;

    for (index, source) in sources.iter().enumerate() {
        let title = source.display_title();
        let notes = source.notes_or_empty();

        match source.due_field() {
            DueField::Absent => collector.push(&title, &notes, None),
            DueField::Present(raw) => match resolve_due_date(raw, zone) {
                Ok(date) if window.contains(date) => collector.push(&title, &notes, Some(date)),
                Ok(_) => {}
                Err(err) => {
                    unparseable_due += 1;
                    debug!(
                        "event=task_due_skipped module=schedule status=degraded source_index={index} error={err}"
                    );
                }
            },
        }

        for rule in &source.recurrence {
            match RecurrenceRule::parse(rule) {
                Ok(parsed) => {
                    for date in parsed.expand(window) {
                        collector.push(&title, &notes, Some(date));
                    }
                }
                Err(err) => {
                    ignored_rules += 1;
                    log_ignored_rule(index, &err);
                }
            }
        }
    }

    let occurrences = collector.finish();
    debug!(
        "event=tasks_normalized module=schedule status=ok sources={} occurrences={} unparseable_due={} ignored_rules={} window_start={} window_end={} zone={}",
        sources.len(),
        occurrences.len(),
        unparseable_due,
        ignored_rules,
        window.start(),
        window.end(),
        zone.label()
    );
    occurrences
}

fn log_ignored_rule(source_index: usize, err: &RecurrenceError) {
    // EXDATE/RDATE lines routinely sit next to the RRULE.
    if matches!(err, RecurrenceError::NotAnRrule) {
        return;
    }
    debug!(
        "event=task_rule_ignored module=schedule status=degraded source_index={source_index} error={err}"
    );
}

#[derive(Default)]
struct OccurrenceCollector {
    seen: HashSet<(String, Option<NaiveDate>)>,
    items: Vec<NormalizedOccurrence>,
}

impl OccurrenceCollector {
    fn push(&mut self, title: &str, notes: &str, date: Option<NaiveDate>) {
        if !self.seen.insert((title.to_string(), date)) {
            return;
        }
        self.items.push(NormalizedOccurrence {
            title: title.to_string(),
            notes: notes.to_string(),
            date,
        });
    }

    fn finish(mut self) -> Vec<NormalizedOccurrence> {
        self.items
            .sort_by(|left, right| (left.date, &left.title).cmp(&(right.date, &right.title)));
        self.items
    }
}

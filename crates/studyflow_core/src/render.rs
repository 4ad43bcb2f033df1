//! Numbered plain-text summaries of normalized agenda records.
//!
//! Each renderer emits a heading with the item count, then one numbered block
//! per item followed by a blank line. Empty input yields a single sentence.

use crate::model::email::NormalizedEmail;
use crate::model::event::NormalizedEvent;
use crate::model::occurrence::NormalizedOccurrence;

/// Renders task occurrences; undated items carry no `Due:` line.
pub fn render_tasks(tasks: &[NormalizedOccurrence]) -> String {
    if tasks.is_empty() {
        return "I couldn't find any tasks.".to_string();
    }
    let mut text = format!("Here are {} task{}:\n\n", tasks.len(), plural(tasks.len()));
    for (number, task) in tasks.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", number + 1, task.title));
        if let Some(date) = task.date {
            text.push_str(&format!("   Due: {date}\n"));
        }
        push_detail(&mut text, &task.notes);
        text.push('\n');
    }
    text
}

pub fn render_events(events: &[NormalizedEvent]) -> String {
    if events.is_empty() {
        return "I couldn't find any calendar events.".to_string();
    }
    let mut text = format!(
        "I found {} calendar event{}:\n\n",
        events.len(),
        plural(events.len())
    );
    for (number, event) in events.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", number + 1, event.title));
        let date = if event.date.is_empty() { "No date" } else { event.date.as_str() };
        text.push_str(&format!("   When: {date}"));
        match (event.start_time.is_empty(), event.end_time.is_empty()) {
            (false, false) => {
                text.push_str(&format!(" from {} to {}", event.start_time, event.end_time))
            }
            (false, true) => text.push_str(&format!(" at {}", event.start_time)),
            _ => {}
        }
        text.push('\n');
        if !event.location.trim().is_empty() {
            text.push_str(&format!("   Where: {}\n", event.location.trim()));
        }
        push_detail(&mut text, &event.description);
        text.push('\n');
    }
    text
}

pub fn render_emails(emails: &[NormalizedEmail]) -> String {
    if emails.is_empty() {
        return "I couldn't find any emails.".to_string();
    }
    let mut text = format!("I found {} email{}:\n\n", emails.len(), plural(emails.len()));
    for (number, email) in emails.iter().enumerate() {
        let subject = or_default(&email.subject, "No subject");
        let sender = or_default(&email.sender, "Unknown sender");
        text.push_str(&format!("{}. {}\n   From: {}", number + 1, subject, sender));
        if !email.date.is_empty() {
            text.push_str(&format!(" ({})", email.date));
        }
        text.push('\n');
        push_detail(&mut text, &email.snippet);
        text.push('\n');
    }
    text
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

/// Appends an indented free-text line, flattened to one line.
fn push_detail(text: &mut String, detail: &str) {
    let flattened = detail.split_whitespace().collect::<Vec<_>>().join(" ");
    if !flattened.is_empty() {
        text.push_str(&format!("   {flattened}\n"));
    }
}

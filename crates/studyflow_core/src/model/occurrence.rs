//! Task occurrence model.
//!
//! # Responsibility
//! - Describe raw task records as returned by the task provider.
//! - Describe the canonical `{title, notes, date}` occurrence emitted by the
//!   normalizer.
//!
//! # Invariants
//! - Blank or missing titles read as [`UNTITLED`].
//! - A blank `due` string is the same as no due date.
//! - `recurrence` accepts one rule string or a list; non-string entries are
//!   dropped during decoding.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used for records whose title is absent or blank.
pub const UNTITLED: &str = "Untitled";

/// Raw task record fetched from an external task provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOccurrenceSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// ISO-8601 timestamp; absent means "no due date".
    #[serde(default)]
    pub due: Option<String>,
    /// `RRULE:`-style rule strings.
    #[serde(
        default,
        deserialize_with = "deserialize_rules",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub recurrence: Vec<String>,
}

/// Classification of the raw `due` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueField<'a> {
    /// Field missing or blank.
    Absent,
    /// Non-blank text, not yet parsed.
    Present(&'a str),
}

impl RawOccurrenceSource {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence.push(rule.into());
        self
    }

    /// Trimmed title, or [`UNTITLED`] when absent/blank.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => UNTITLED.to_string(),
        }
    }

    pub fn notes_or_empty(&self) -> String {
        self.notes.clone().unwrap_or_default()
    }

    pub fn due_field(&self) -> DueField<'_> {
        match self.due.as_deref().map(str::trim) {
            Some(due) if !due.is_empty() => DueField::Present(due),
            _ => DueField::Absent,
        }
    }
}

/// Canonical occurrence emitted by the normalizer.
///
/// `date == None` marks an undated item and serializes as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedOccurrence {
    pub title: String,
    pub notes: String,
    #[serde(with = "date_or_empty")]
    pub date: Option<NaiveDate>,
}

impl NormalizedOccurrence {
    /// Returns `YYYY-MM-DD`, or an empty string for undated items.
    pub fn date_string(&self) -> String {
        self.date.map(|date| date.to_string()).unwrap_or_default()
    }
}

/// Serde adapter for `Option<NaiveDate>` written as `YYYY-MM-DD` or `""`.
pub mod date_or_empty {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

fn deserialize_rules<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let rules = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(rule)) => vec![rule],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(rule) => Some(rule),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::{DueField, NormalizedOccurrence, RawOccurrenceSource, UNTITLED};
    use chrono::NaiveDate;

    #[test]
    fn recurrence_accepts_single_string_or_list() {
        let single: RawOccurrenceSource = serde_json::from_value(serde_json::json!({
            "title": "gym",
            "recurrence": "RRULE:FREQ=DAILY"
        }))
        .unwrap();
        assert_eq!(single.recurrence, vec!["RRULE:FREQ=DAILY".to_string()]);

        let list: RawOccurrenceSource = serde_json::from_value(serde_json::json!({
            "title": "gym",
            "recurrence": ["RRULE:FREQ=DAILY", 42, null, "EXDATE:20251120"]
        }))
        .unwrap();
        assert_eq!(
            list.recurrence,
            vec!["RRULE:FREQ=DAILY".to_string(), "EXDATE:20251120".to_string()]
        );
    }

    #[test]
    fn blank_title_and_due_fall_back() {
        let source: RawOccurrenceSource = serde_json::from_value(serde_json::json!({
            "title": "   ",
            "due": " "
        }))
        .unwrap();
        assert_eq!(source.display_title(), UNTITLED);
        assert_eq!(source.due_field(), DueField::Absent);
        assert_eq!(source.notes_or_empty(), "");
    }

    #[test]
    fn undated_occurrence_serializes_empty_date() {
        let undated = NormalizedOccurrence {
            title: "read".to_string(),
            notes: String::new(),
            date: None,
        };
        let json = serde_json::to_value(&undated).unwrap();
        assert_eq!(json["date"], "");

        let dated = NormalizedOccurrence {
            date: NaiveDate::from_ymd_opt(2025, 3, 4),
            ..undated
        };
        let json = serde_json::to_value(&dated).unwrap();
        assert_eq!(json["date"], "2025-03-04");
        let decoded: NormalizedOccurrence = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, dated);
    }
}

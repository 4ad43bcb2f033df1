//! Local time-zone selection.
//!
//! Every "convert to local" step in the core goes through [`LocalZone`], so a
//! configured IANA zone (or a test) can pin what "local" means.

use crate::model::window::TimeWindow;
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

/// Zone resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("unknown time zone `{0}`")]
    UnknownZone(String),
    #[error("local time {0} does not exist in the selected zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Zone used as "local" by conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The machine's local zone.
    #[default]
    System,
    /// A named IANA zone.
    Named(Tz),
}

impl LocalZone {
    /// Parses an IANA zone name such as `America/New_York`.
    pub fn parse(name: &str) -> Result<Self, ZoneError> {
        let trimmed = name.trim();
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| ZoneError::UnknownZone(trimmed.to_string()))
    }

    /// Stable label used in log lines.
    pub fn label(&self) -> String {
        match self {
            Self::System => "system".to_string(),
            Self::Named(tz) => tz.name().to_string(),
        }
    }

    /// Converts an instant to local wall-clock time.
    pub fn to_local(&self, instant: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            Self::System => instant.with_timezone(&Local).naive_local(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Returns today's date in this zone.
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => Local::now().date_naive(),
            Self::Named(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }

    /// Attaches this zone's offset to a wall-clock time.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>, ZoneError> {
        let resolved = match self {
            Self::System => pick_earliest(Local.from_local_datetime(&naive)),
            Self::Named(tz) => pick_earliest(tz.from_local_datetime(&naive)),
        };
        resolved.ok_or(ZoneError::NonexistentLocalTime(naive))
    }

    /// Returns RFC-3339 UTC bounds `(first day 00:00:00, last day 23:59:59)`
    /// for querying providers over `window`.
    pub fn window_bounds_utc(&self, window: &TimeWindow) -> Result<(String, String), ZoneError> {
        let start = self.localize(window.start().and_time(NaiveTime::MIN))?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end = self.localize(window.end().and_time(end_of_day))?;
        Ok((to_utc_rfc3339(&start), to_utc_rfc3339(&end)))
    }
}

fn pick_earliest<Tz2: TimeZone>(result: LocalResult<DateTime<Tz2>>) -> Option<DateTime<FixedOffset>> {
    result.earliest().map(|dt| dt.fixed_offset())
}

/// Formats an instant as RFC-3339 UTC with a `Z` suffix.
pub fn to_utc_rfc3339(instant: &DateTime<FixedOffset>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::{LocalZone, ZoneError};
    use crate::model::window::TimeWindow;
    use chrono::{DateTime, NaiveDate};

    #[test]
    fn parse_accepts_iana_names_and_rejects_garbage() {
        assert!(matches!(
            LocalZone::parse(" America/New_York "),
            Ok(LocalZone::Named(_))
        ));
        assert_eq!(
            LocalZone::parse("Mars/Olympus").unwrap_err(),
            ZoneError::UnknownZone("Mars/Olympus".to_string())
        );
    }

    #[test]
    fn to_local_shifts_calendar_day_for_negative_offsets() {
        let zone = LocalZone::parse("America/Los_Angeles").unwrap();
        let instant = DateTime::parse_from_rfc3339("2025-11-20T03:00:00Z").unwrap();
        let local = zone.to_local(&instant);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 11, 19).unwrap());
    }

    #[test]
    fn window_bounds_are_reported_in_utc() {
        let zone = LocalZone::parse("Asia/Tokyo").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let (min, max) = zone
            .window_bounds_utc(&TimeWindow::single_day(day))
            .unwrap();
        assert_eq!(min, "2025-11-19T15:00:00Z");
        assert_eq!(max, "2025-11-20T14:59:59Z");
    }
}

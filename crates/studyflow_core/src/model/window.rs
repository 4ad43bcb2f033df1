//! Inclusive calendar-day window used for lookahead filtering.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lookahead length in days when the caller does not configure one.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;

/// Window construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window start {start} is after window end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
    #[error("window of {days} day(s) from {start} overflows the calendar range")]
    OutOfRange { start: NaiveDate, days: u32 },
}

/// Inclusive `[start, end]` range of calendar dates.
///
/// # Invariants
/// - `start <= end` always holds; the constructor rejects inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for TimeWindow {
    type Error = WindowError;

    fn try_from(value: WindowBounds) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl TimeWindow {
    /// Creates a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates the window `today ..= today + days`.
    pub fn lookahead(today: NaiveDate, days: u32) -> Result<Self, WindowError> {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(WindowError::OutOfRange { start: today, days })?;
        Self::new(today, end)
    }

    /// Creates a window covering one calendar day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns whether `date` lies inside the window, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn len_days(&self) -> u64 {
        // start <= end, so the difference is never negative.
        (self.end - self.start).num_days().unsigned_abs() + 1
    }
}

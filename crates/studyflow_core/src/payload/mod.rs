//! Outbound payloads for the calendar, task and mail providers.
//!
//! # Responsibility
//! - Turn model-produced drafts (`{title, date, start_time, ...}`) into the
//!   provider resource shapes.
//! - Reject drafts that cannot produce a valid resource.
//!
//! # Invariants
//! - Event instants are sent as UTC with an explicit `timeZone: "UTC"`.
//! - Task due values are local midnight with their UTC offset, so clients show
//!   the intended calendar day.

use crate::schedule::zone::ZoneError;
use thiserror::Error;

pub mod calendar;
pub mod email;

pub type PayloadResult<T> = Result<T, PayloadError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("required field `{0}` is missing or blank")]
    MissingField(&'static str),
    #[error("field `{field}` has invalid value `{value}`")]
    InvalidField { field: &'static str, value: String },
    #[error("event end {end} is before start {start}")]
    EndBeforeStart { start: String, end: String },
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

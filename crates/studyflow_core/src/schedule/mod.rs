//! Date handling for provider task/event data.
//!
//! # Responsibility
//! - Parse ISO-8601 timestamps and resolve them to local calendar dates.
//! - Expand the supported RRULE subset into concrete dates.
//! - Normalize raw tasks and events into canonical, sorted records.
//!
//! # Invariants
//! - Everything here is pure and synchronous: no I/O, no shared state.
//! - "Local" always means the [`zone::LocalZone`] passed by the caller.

pub mod events;
pub mod normalizer;
pub mod rrule;
pub mod timestamp;
pub mod zone;

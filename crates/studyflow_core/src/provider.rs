//! Seams for external collaborators.
//!
//! # Responsibility
//! - Describe what the core needs from the calendar/task/mail provider and
//!   the embedding service, without binding to any transport.
//!
//! # Invariants
//! - Implementations own credentials and network policy; the core never
//!   retries or caches provider calls.
//! - Provider failures surface as [`ProviderError`] and are fatal for the
//!   calling use case only.

use crate::model::email::RawEmail;
use crate::model::event::RawEvent;
use crate::model::occurrence::RawOccurrenceSource;
use crate::payload::calendar::{EventPayload, TaskPayload};
use crate::payload::email::EmailPayload;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    #[error("provider returned malformed data: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "provider_unavailable",
            Self::Rejected(_) => "provider_rejected",
            Self::Malformed(_) => "provider_malformed",
        }
    }
}

/// Identifier of a resource created by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReceipt {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Source of raw task records.
pub trait TaskSource {
    fn list_tasks(&self) -> ProviderResult<Vec<RawOccurrenceSource>>;
}

/// Source of raw calendar events.
pub trait EventSource {
    /// Lists events overlapping `[time_min, time_max]`, both RFC-3339 UTC.
    fn list_events(&self, time_min: &str, time_max: &str) -> ProviderResult<Vec<RawEvent>>;
}

/// Source of raw mail messages.
pub trait EmailSource {
    /// Lists messages received on or after `after` (local calendar date).
    fn list_emails(&self, after: NaiveDate) -> ProviderResult<Vec<RawEmail>>;
}

/// Text embedding service.
pub trait Embedder {
    /// Returns a vector whose dimension is fixed for this embedder.
    fn embed(&self, text: &str) -> ProviderResult<Vec<f32>>;
}

/// Destination for outbound calendar, task and mail payloads.
pub trait DeliverySink {
    fn create_event(&self, payload: &EventPayload) -> ProviderResult<ProviderReceipt>;
    fn create_task(&self, payload: &TaskPayload) -> ProviderResult<ProviderReceipt>;
    fn send_email(&self, payload: &EmailPayload) -> ProviderResult<ProviderReceipt>;
}

//! Agenda use-case service.
//!
//! # Responsibility
//! - Fetch raw tasks, events and mail from a provider and hand them to the
//!   normalizers.
//!
//! # Invariants
//! - The lookahead window, mail lookback and local zone always come from
//!   [`CoreConfig`].
//! - Provider failures are logged by code and returned; normalization itself
//!   never fails.

use crate::config::CoreConfig;
use crate::inbox::normalize_emails;
use crate::model::email::NormalizedEmail;
use crate::model::event::NormalizedEvent;
use crate::model::occurrence::NormalizedOccurrence;
use crate::model::window::TimeWindow;
use crate::provider::{EmailSource, EventSource, TaskSource};
use crate::schedule::events::normalize_events;
use crate::schedule::normalizer::normalize;
use crate::service::{ServiceError, ServiceResult};
use chrono::{Days, NaiveDate};
use log::{info, warn};
use std::time::Instant;

/// Read-side agenda service over one provider.
pub struct AgendaService<P> {
    provider: P,
    config: CoreConfig,
}

impl<P> AgendaService<P> {
    pub fn new(provider: P, config: CoreConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }
}

impl<P: TaskSource> AgendaService<P> {
    /// Returns task occurrences from `today` through the configured lookahead.
    pub fn upcoming_tasks(&self, today: NaiveDate) -> ServiceResult<Vec<NormalizedOccurrence>> {
        let started_at = Instant::now();
        let window = TimeWindow::lookahead(today, self.config.lookahead_days)?;
        let sources = self
            .provider
            .list_tasks()
            .map_err(|err| log_failure("agenda_tasks", ServiceError::from(err)))?;

        let occurrences = normalize(&sources, &window, &self.config.zone);
        info!(
            "event=agenda_tasks module=service status=ok sources={} occurrences={} duration_ms={}",
            sources.len(),
            occurrences.len(),
            started_at.elapsed().as_millis()
        );
        Ok(occurrences)
    }
}

impl<P: EventSource> AgendaService<P> {
    /// Returns events inside `window`, reported in the configured zone.
    ///
    /// Events carrying neither a date nor a date-time are dated
    /// `window.start()`.
    pub fn events_for(&self, window: &TimeWindow) -> ServiceResult<Vec<NormalizedEvent>> {
        let started_at = Instant::now();
        let (time_min, time_max) = self.config.zone.window_bounds_utc(window)?;
        let raw = self
            .provider
            .list_events(&time_min, &time_max)
            .map_err(|err| log_failure("agenda_events", ServiceError::from(err)))?;

        let events = normalize_events(&raw, &self.config.zone, window.start());
        info!(
            "event=agenda_events module=service status=ok events={} duration_ms={}",
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(events)
    }
}

impl<P: EmailSource> AgendaService<P> {
    /// Returns messages from the last `email_lookback_days` days, `today`
    /// included.
    pub fn recent_emails(&self, today: NaiveDate) -> ServiceResult<Vec<NormalizedEmail>> {
        let started_at = Instant::now();
        let lookback = self.config.email_lookback_days;
        let after = today
            .checked_sub_days(Days::new(u64::from(lookback)))
            .ok_or_else(|| {
                ServiceError::InvalidRequest(format!(
                    "mail lookback of {lookback} days from {today} is out of range"
                ))
            })?;
        let raw = self
            .provider
            .list_emails(after)
            .map_err(|err| log_failure("agenda_emails", ServiceError::from(err)))?;

        let emails = normalize_emails(&raw);
        info!(
            "event=agenda_emails module=service status=ok lookback_days={} emails={} duration_ms={}",
            lookback,
            emails.len(),
            started_at.elapsed().as_millis()
        );
        Ok(emails)
    }
}

fn log_failure(event: &str, err: ServiceError) -> ServiceError {
    warn!(
        "event={event} module=service status=error error_code={} error={err}",
        err.code()
    );
    err
}

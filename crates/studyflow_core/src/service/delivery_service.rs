//! Outbound delivery of calendar events, tasks and emails.
//!
//! # Responsibility
//! - Build provider payloads from drafts.
//! - Push them through a [`DeliverySink`], or return them untouched in
//!   dry-run mode.
//!
//! # Invariants
//! - Invalid drafts fail before the sink is called.
//! - In dry-run mode the sink is never called.

use crate::config::CoreConfig;
use crate::payload::calendar::{
    build_event_payload, build_task_payload, EventDraft, EventPayload, TaskDraft, TaskPayload,
};
use crate::payload::email::{build_email_payload, EmailDraft, EmailPayload};
use crate::provider::{DeliverySink, ProviderReceipt, ProviderResult};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use serde::Serialize;

/// Result of one delivery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome<T> {
    DryRun { payload: T },
    Delivered { payload: T, receipt: ProviderReceipt },
}

impl<T> DeliveryOutcome<T> {
    pub fn payload(&self) -> &T {
        match self {
            Self::DryRun { payload } | Self::Delivered { payload, .. } => payload,
        }
    }

    pub fn receipt(&self) -> Option<&ProviderReceipt> {
        match self {
            Self::DryRun { .. } => None,
            Self::Delivered { receipt, .. } => Some(receipt),
        }
    }
}

pub struct DeliveryService<S: DeliverySink> {
    sink: S,
    config: CoreConfig,
}

impl<S: DeliverySink> DeliveryService<S> {
    pub fn new(sink: S, config: CoreConfig) -> Self {
        Self { sink, config }
    }

    pub fn schedule_event(&self, draft: &EventDraft) -> ServiceResult<DeliveryOutcome<EventPayload>> {
        let payload = build_event_payload(draft, &self.config.zone)?;
        self.deliver("calendar_event", payload, |sink, payload| sink.create_event(payload))
    }

    pub fn add_task(&self, draft: &TaskDraft) -> ServiceResult<DeliveryOutcome<TaskPayload>> {
        let payload = build_task_payload(draft, &self.config.zone)?;
        self.deliver("task", payload, |sink, payload| sink.create_task(payload))
    }

    pub fn send_email(&self, draft: &EmailDraft) -> ServiceResult<DeliveryOutcome<EmailPayload>> {
        let payload = build_email_payload(draft)?;
        self.deliver("email", payload, |sink, payload| sink.send_email(payload))
    }

    fn deliver<T>(
        &self,
        kind: &str,
        payload: T,
        push: impl FnOnce(&S, &T) -> ProviderResult<ProviderReceipt>,
    ) -> ServiceResult<DeliveryOutcome<T>> {
        if self.config.dry_run {
            info!("event=delivery module=service status=dry_run kind={kind}");
            return Ok(DeliveryOutcome::DryRun { payload });
        }

        match push(&self.sink, &payload) {
            Ok(receipt) => {
                info!(
                    "event=delivery module=service status=ok kind={kind} resource_id={}",
                    receipt.id
                );
                Ok(DeliveryOutcome::Delivered { payload, receipt })
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!(
                    "event=delivery module=service status=error kind={kind} error_code={} error={err}",
                    err.code()
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryOutcome, DeliveryService};
    use crate::config::CoreConfig;
    use crate::payload::calendar::{EventDraft, EventPayload, TaskDraft, TaskPayload};
    use crate::payload::email::{EmailDraft, EmailPayload};
    use crate::payload::PayloadError;
    use crate::provider::{DeliverySink, ProviderError, ProviderReceipt, ProviderResult};
    use crate::schedule::zone::LocalZone;
    use crate::service::ServiceError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        calls: RefCell<Vec<String>>,
        reject: bool,
    }

    impl RecordingSink {
        fn record(&self, kind: &str) -> ProviderResult<ProviderReceipt> {
            if self.reject {
                return Err(ProviderError::Rejected("quota".to_string()));
            }
            self.calls.borrow_mut().push(kind.to_string());
            Ok(ProviderReceipt {
                id: format!("{kind}-1"),
                link: None,
            })
        }
    }

    impl DeliverySink for RecordingSink {
        fn create_event(&self, _payload: &EventPayload) -> ProviderResult<ProviderReceipt> {
            self.record("event")
        }

        fn create_task(&self, _payload: &TaskPayload) -> ProviderResult<ProviderReceipt> {
            self.record("task")
        }

        fn send_email(&self, _payload: &EmailPayload) -> ProviderResult<ProviderReceipt> {
            self.record("email")
        }
    }

    fn utc_config(dry_run: bool) -> CoreConfig {
        CoreConfig {
            zone: LocalZone::parse("UTC").unwrap(),
            dry_run,
            ..CoreConfig::default()
        }
    }

    fn lecture() -> EventDraft {
        EventDraft {
            title: Some("Lecture".to_string()),
            date: "2025-11-20".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            ..EventDraft::default()
        }
    }

    #[test]
    fn delivered_outcome_carries_receipt() {
        let service = DeliveryService::new(RecordingSink::default(), utc_config(false));
        let outcome = service.schedule_event(&lecture()).unwrap();
        assert_eq!(outcome.receipt().map(|r| r.id.as_str()), Some("event-1"));
        assert_eq!(outcome.payload().start.date_time, "2025-11-20T10:00:00Z");
        assert_eq!(*service.sink.calls.borrow(), vec!["event".to_string()]);
    }

    #[test]
    fn dry_run_never_calls_sink() {
        let service = DeliveryService::new(RecordingSink::default(), utc_config(true));
        let outcome = service
            .add_task(&TaskDraft {
                title: Some("Read chapter 4".to_string()),
                due_date: Some("2025-11-21".to_string()),
                ..TaskDraft::default()
            })
            .unwrap();
        assert!(matches!(outcome, DeliveryOutcome::DryRun { .. }));
        assert_eq!(outcome.payload().due.as_deref(), Some("2025-11-21T00:00:00+00:00"));
        assert!(service.sink.calls.borrow().is_empty());
    }

    #[test]
    fn invalid_draft_fails_before_sink() {
        let service = DeliveryService::new(RecordingSink::default(), utc_config(false));
        let err = service.send_email(&EmailDraft::default()).unwrap_err();
        assert!(matches!(err, ServiceError::Payload(PayloadError::MissingField("to"))));
        assert!(service.sink.calls.borrow().is_empty());
    }

    #[test]
    fn sink_rejection_is_returned() {
        let sink = RecordingSink {
            reject: true,
            ..RecordingSink::default()
        };
        let service = DeliveryService::new(sink, utc_config(false));
        let err = service.schedule_event(&lecture()).unwrap_err();
        assert_eq!(err.code(), "provider_rejected");
    }
}

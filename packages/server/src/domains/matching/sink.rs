//! Notification sink.
//!
//! Consumes match events and turns each into a durable, deduplicated
//! notification plus a best-effort real-time push. Persistence and push are
//! deliberately decoupled: a push failure never rolls back the row, since the
//! company can still pull it from the read API.

use anyhow::Result;
use async_nats::jetstream::consumer::PullConsumer;
use async_nats::jetstream::AckKind;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{BaseCompanyPush, BaseNotificationStore};

use super::consumer::retry_backoff;
use super::events::ApplicantMatchedEvent;

/// Terminal disposition of one match event.
#[derive(Debug, PartialEq, Eq)]
pub enum SinkOutcome {
    /// First delivery for the pair: row persisted, push attempted.
    Created,
    /// The pair already had a notification; nothing visible happened.
    Duplicate,
    /// Non-retryable (malformed payload); terminate the delivery.
    Dropped { reason: String },
    /// Retryable (store unavailable); nak with backoff.
    Retry { reason: String },
}

/// Persists notifications from match events and pushes them in real time.
pub struct NotificationSink {
    store: Arc<dyn BaseNotificationStore>,
    push: Arc<dyn BaseCompanyPush>,
    max_deliveries: i64,
}

impl NotificationSink {
    pub fn new(deps: &ServerDeps, max_deliveries: i64) -> Self {
        Self {
            store: deps.notification_store.clone(),
            push: deps.company_push.clone(),
            max_deliveries,
        }
    }

    /// Handle one match event payload. Duplicate deliveries are expected
    /// under at-least-once and are not errors.
    pub async fn process(&self, payload: &[u8]) -> SinkOutcome {
        let event: ApplicantMatchedEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping malformed match event");
                return SinkOutcome::Dropped {
                    reason: format!("malformed payload: {}", e),
                };
            }
        };

        let (created, notification) = match self
            .store
            .upsert_if_absent(event.company_id, event.applicant_id, &event.applicant_name)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    company_id = %event.company_id,
                    applicant_id = %event.applicant_id,
                    error = %e,
                    "notification store unavailable, match event will be retried"
                );
                return SinkOutcome::Retry {
                    reason: e.to_string(),
                };
            }
        };

        if !created {
            debug!(
                company_id = %event.company_id,
                applicant_id = %event.applicant_id,
                "duplicate match event, notification already exists"
            );
            return SinkOutcome::Duplicate;
        }

        info!(
            company_id = %event.company_id,
            applicant_id = %event.applicant_id,
            notification_id = %notification.id,
            "notification created"
        );

        // Best-effort push; the row is already durable.
        if let Err(e) = self
            .push
            .push_to_company(event.company_id, &notification)
            .await
        {
            warn!(
                company_id = %event.company_id,
                notification_id = %notification.id,
                error = %e,
                "real-time push failed, notification remains retrievable"
            );
        }
        if let Err(e) = self.push.broadcast(&notification).await {
            warn!(notification_id = %notification.id, error = %e, "broadcast push failed");
        }

        SinkOutcome::Created
    }

    /// Pull match events until shutdown, mapping outcomes onto acks.
    pub async fn run(
        &self,
        consumer: PullConsumer,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut messages = consumer.messages().await?;

        info!("notification sink started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("notification sink draining");
                    break;
                }
                next = messages.next() => {
                    match next {
                        Some(Ok(message)) => self.handle_message(message).await,
                        Some(Err(e)) => {
                            warn!(error = %e, "match stream error");
                        }
                        None => {
                            warn!("match stream closed");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_message(&self, message: async_nats::jetstream::Message) {
        let delivered = message.info().map(|info| info.delivered).unwrap_or(1);

        let ack = match self.process(&message.payload).await {
            SinkOutcome::Created | SinkOutcome::Duplicate => AckKind::Ack,
            SinkOutcome::Dropped { .. } => AckKind::Term,
            SinkOutcome::Retry { reason } => {
                if delivered >= self.max_deliveries {
                    error!(
                        delivered,
                        reason = %reason,
                        "retry budget exhausted, dead-lettering match event"
                    );
                    AckKind::Term
                } else {
                    AckKind::Nak(Some(retry_backoff(delivered)))
                }
            }
        };

        if let Err(e) = message.ack_with(ack).await {
            warn!(error = %e, "failed to ack match event");
        }
    }
}

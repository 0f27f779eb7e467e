//! Applicant event consumer.
//!
//! Pulls applicant-created events from JetStream and drives each through
//! deserialize → directory fetch → match evaluation → fan-out emission,
//! acknowledging only after every emission has been attempted.
//!
//! Delivery policy: at-least-once. A missed match is worse than a duplicate,
//! so retryable failures (directory outage) are nak'd with backoff instead of
//! acknowledged, and the sink downstream absorbs any duplicates the retries
//! produce.

use anyhow::Result;
use async_nats::jetstream::consumer::PullConsumer;
use async_nats::jetstream::AckKind;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domains::directory::BaseProfileDirectory;
use crate::kernel::deps::ServerDeps;

use super::engine::find_matching_companies;
use super::models::ApplicantSnapshot;
use super::publisher::MatchEventPublisher;

/// Delay before retrying a single failed per-company emission in place.
const EMISSION_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Terminal disposition of one inbound event.
#[derive(Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Pipeline ran to the end; ack. Zero matches is a valid completion.
    Completed { matched: usize, emitted: usize },
    /// Non-retryable (malformed payload); terminate the delivery.
    Dropped { reason: String },
    /// Retryable (dependency unavailable); nak with backoff.
    Retry { reason: String },
}

/// Tuning knobs for the consumer, sourced from [`crate::config::Config`].
#[derive(Debug, Clone, Copy)]
pub struct ConsumerSettings {
    /// Upper bound on concurrent per-company emissions for one event.
    pub emission_concurrency: usize,
    /// Deliveries after which a retryable event is dead-lettered.
    pub max_deliveries: i64,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            emission_concurrency: 8,
            max_deliveries: 5,
        }
    }
}

/// Consumes applicant-created events and emits match events.
pub struct ApplicantEventConsumer {
    directory: Arc<dyn BaseProfileDirectory>,
    publisher: MatchEventPublisher,
    settings: ConsumerSettings,
}

impl ApplicantEventConsumer {
    pub fn new(deps: &ServerDeps, settings: ConsumerSettings) -> Self {
        Self {
            directory: deps.profile_directory.clone(),
            publisher: MatchEventPublisher::new(deps.event_publisher.clone()),
            settings,
        }
    }

    /// Run one event through the pipeline. Pure with respect to the inbound
    /// stream: acking is the caller's job, driven by the returned outcome.
    pub async fn process(&self, payload: &[u8]) -> EventOutcome {
        let snapshot: ApplicantSnapshot = match serde_json::from_slice(payload) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "dropping malformed applicant-created event");
                return EventOutcome::Dropped {
                    reason: format!("malformed payload: {}", e),
                };
            }
        };

        let profiles = match self.directory.get_all_search_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                // Directory down is not "zero matches"; leave the event
                // unacknowledged so it comes back.
                warn!(
                    applicant_id = %snapshot.applicant_id,
                    error = %e,
                    "profile directory unavailable, event will be retried"
                );
                return EventOutcome::Retry {
                    reason: e.to_string(),
                };
            }
        };

        let company_ids = find_matching_companies(&snapshot, &profiles);
        if company_ids.is_empty() {
            info!(
                applicant_id = %snapshot.applicant_id,
                profiles = profiles.len(),
                "no matching companies for applicant"
            );
            return EventOutcome::Completed {
                matched: 0,
                emitted: 0,
            };
        }

        let emitted = self.emit_matches(&snapshot, &company_ids).await;

        info!(
            applicant_id = %snapshot.applicant_id,
            matched = company_ids.len(),
            emitted,
            "matching complete for applicant"
        );

        EventOutcome::Completed {
            matched: company_ids.len(),
            emitted,
        }
    }

    /// Fan out one match event per company with bounded parallelism. Each
    /// emission is isolated: a failure is retried once in place, then logged
    /// and counted out without aborting the rest.
    async fn emit_matches(&self, snapshot: &ApplicantSnapshot, company_ids: &[Uuid]) -> usize {
        let results: Vec<bool> = stream::iter(
            company_ids
                .to_vec()
                .into_iter()
                .map(|company_id| self.emit_one(snapshot, company_id)),
        )
        .buffer_unordered(self.settings.emission_concurrency)
        .collect()
        .await;

        results.into_iter().filter(|emitted| *emitted).count()
    }

    async fn emit_one(&self, snapshot: &ApplicantSnapshot, company_id: Uuid) -> bool {
        let first_attempt = self
            .publisher
            .publish_match(company_id, snapshot.applicant_id, &snapshot.display_name)
            .await;

        let Err(first_err) = first_attempt else {
            return true;
        };

        warn!(
            company_id = %company_id,
            applicant_id = %snapshot.applicant_id,
            error = %first_err,
            "match emission failed, retrying once"
        );
        tokio::time::sleep(EMISSION_RETRY_DELAY).await;

        match self
            .publisher
            .publish_match(company_id, snapshot.applicant_id, &snapshot.display_name)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(
                    company_id = %company_id,
                    applicant_id = %snapshot.applicant_id,
                    error = %e,
                    "match emission failed after retry, giving up on this company"
                );
                false
            }
        }
    }

    /// Pull messages until shutdown, mapping outcomes onto JetStream acks.
    pub async fn run(
        &self,
        consumer: PullConsumer,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut messages = consumer.messages().await?;

        info!("applicant event consumer started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("applicant event consumer draining");
                    break;
                }
                next = messages.next() => {
                    match next {
                        Some(Ok(message)) => self.handle_message(message).await,
                        Some(Err(e)) => {
                            warn!(error = %e, "applicant stream error");
                        }
                        None => {
                            warn!("applicant stream closed");
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
            EventOutcome::Completed { .. } => AckKind::Ack,
            EventOutcome::Dropped { .. } => AckKind::Term,
            EventOutcome::Retry { reason } => {
                if delivered >= self.settings.max_deliveries {
                    error!(
                        delivered,
                        reason = %reason,
                        "retry budget exhausted, dead-lettering applicant event"
                    );
                    AckKind::Term
                } else {
                    let delay = retry_backoff(delivered);
                    debug!(delivered, delay_secs = delay.as_secs(), "nak with backoff");
                    AckKind::Nak(Some(delay))
                }
            }
        };

        if let Err(e) = message.ack_with(ack).await {
            warn!(error = %e, "failed to ack applicant event");
        }
    }
}

/// Exponential backoff by delivery count, capped at one hour.
pub(crate) fn retry_backoff(delivered: i64) -> Duration {
    let exp = delivered.clamp(1, 12) as u32;
    Duration::from_secs(2u64.pow(exp).min(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_backoff_grows_and_caps() {
        assert_eq!(retry_backoff(1), Duration::from_secs(2));
        assert_eq!(retry_backoff(3), Duration::from_secs(8));
        assert_eq!(retry_backoff(100), Duration::from_secs(3600));
    }
}

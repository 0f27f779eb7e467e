//! Match event publisher.
//!
//! Serializes one [`ApplicantMatchedEvent`] per qualifying company onto the
//! match subject. Publishing the same arguments twice is safe - deduplication
//! is the notification sink's job, not the publisher's.

use anyhow::Result;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::kernel::nats::NatsPublisher;

use super::events::{ApplicantMatchedEvent, APPLICANT_MATCHED_SUBJECT};

/// Emits applicant-matched events over the injected NATS publisher.
#[derive(Clone)]
pub struct MatchEventPublisher {
    nats: Arc<dyn NatsPublisher>,
}

impl MatchEventPublisher {
    pub fn new(nats: Arc<dyn NatsPublisher>) -> Self {
        Self { nats }
    }

    /// Publish a single match event for (company, applicant).
    pub async fn publish_match(
        &self,
        company_id: Uuid,
        applicant_id: Uuid,
        applicant_name: &str,
    ) -> Result<()> {
        let event = ApplicantMatchedEvent {
            company_id,
            applicant_id,
            applicant_name: applicant_name.to_string(),
        };
        let payload = serde_json::to_vec(&event)?;

        debug!(
            company_id = %company_id,
            applicant_id = %applicant_id,
            subject = APPLICANT_MATCHED_SUBJECT,
            "publishing match event"
        );

        self.nats
            .publish(APPLICANT_MATCHED_SUBJECT.to_string(), Bytes::from(payload))
            .await
    }
}

//! NATS client abstraction for production and testing.
//!
//! Provides a trait-based publisher so pipeline components can swap between
//! a real NATS connection and a capturing test mock, plus JetStream setup
//! helpers for the two durable consumers.

use anyhow::Result;
use async_nats::jetstream;
use async_nats::jetstream::consumer::PullConsumer;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Mutex, RwLock};

/// A published message captured by [`TestNats`].
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub subject: String,
    pub payload: Bytes,
}

/// Trait for NATS publish operations.
#[async_trait]
pub trait NatsPublisher: Send + Sync {
    /// Publish a message to a subject.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()>;
}

/// Real NATS client publisher.
pub struct NatsClientPublisher {
    client: async_nats::Client,
}

impl NatsClientPublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NatsPublisher for NatsClientPublisher {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()> {
        self.client.publish(subject, payload).await?;
        Ok(())
    }
}

/// Ensure a stream exists for `subject` and return its durable pull consumer.
///
/// Both the applicant consumer and the notification sink bind this way, so a
/// restart resumes from the last acknowledged message.
pub async fn ensure_pull_consumer(
    js: &jetstream::Context,
    stream_name: &str,
    subject: &str,
    durable_name: &str,
) -> Result<PullConsumer> {
    let stream = js
        .get_or_create_stream(jetstream::stream::Config {
            name: stream_name.to_string(),
            subjects: vec![subject.to_string()],
            ..Default::default()
        })
        .await?;

    let consumer = stream
        .get_or_create_consumer(
            durable_name,
            jetstream::consumer::pull::Config {
                durable_name: Some(durable_name.to_string()),
                ..Default::default()
            },
        )
        .await?;

    Ok(consumer)
}

/// Mock NATS client that records published messages for testing.
///
/// Tests can also inject failures for payloads containing a marker string,
/// which is how per-company emission faults are simulated without a broker.
#[derive(Default)]
pub struct TestNats {
    published: RwLock<Vec<PublishedMessage>>,
    fail_payloads_containing: Mutex<Option<String>>,
}

impl TestNats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make publishes fail when the UTF-8 payload contains `marker`.
    pub fn fail_payloads_containing(&self, marker: &str) {
        *self
            .fail_payloads_containing
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(marker.to_string());
    }

    /// Stop injecting publish failures.
    pub fn clear_failures(&self) {
        *self
            .fail_payloads_containing
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Get all published messages.
    pub fn published_messages(&self) -> Vec<PublishedMessage> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Get published messages for a specific subject.
    pub fn messages_for_subject(&self, subject: &str) -> Vec<PublishedMessage> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| m.subject == subject)
            .cloned()
            .collect()
    }

    /// Get the count of messages published to a specific subject.
    pub fn publish_count_for(&self, subject: &str) -> usize {
        self.messages_for_subject(subject).len()
    }

    /// Check if any message was published to a subject.
    pub fn was_published_to(&self, subject: &str) -> bool {
        self.publish_count_for(subject) > 0
    }

    /// Deserialize a published message payload as JSON.
    pub fn deserialize_message<T: serde::de::DeserializeOwned>(
        &self,
        msg: &PublishedMessage,
    ) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&msg.payload)
    }
}

#[async_trait]
impl NatsPublisher for TestNats {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<()> {
        let marker = self
            .fail_payloads_containing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(marker) = marker {
            if String::from_utf8_lossy(&payload).contains(&marker) {
                anyhow::bail!("injected publish failure for {}", subject);
            }
        }

        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(PublishedMessage { subject, payload });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_retrieve_messages() {
        let nats = TestNats::new();

        nats.publish(
            "applicants.matched".to_string(),
            Bytes::from(r#"{"companyId":"123"}"#),
        )
        .await
        .unwrap();

        assert_eq!(nats.publish_count_for("applicants.matched"), 1);
        assert!(nats.was_published_to("applicants.matched"));
        assert!(!nats.was_published_to("applicants.created"));
    }

    #[tokio::test]
    async fn test_injected_failures_match_payload_marker() {
        let nats = TestNats::new();
        nats.fail_payloads_containing("bad-company");

        let err = nats
            .publish("applicants.matched".to_string(), Bytes::from("bad-company"))
            .await;
        assert!(err.is_err());

        nats.publish("applicants.matched".to_string(), Bytes::from("fine"))
            .await
            .unwrap();
        assert_eq!(nats.published_messages().len(), 1);

        nats.clear_failures();
        nats.publish("applicants.matched".to_string(), Bytes::from("bad-company"))
            .await
            .unwrap();
        assert_eq!(nats.published_messages().len(), 2);
    }
}

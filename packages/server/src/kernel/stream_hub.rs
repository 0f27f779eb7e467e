//! Generic in-process pub/sub hub for real-time streaming.
//!
//! Topic-keyed broadcast channels feeding the SSE endpoints. Topics are
//! opaque strings; the helpers below name the two the notification sink
//! publishes to.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Topic receiving every notification, regardless of company.
pub const BROADCAST_TOPIC: &str = "notifications.broadcast";

/// Per-company real-time channel topic.
pub fn company_topic(company_id: Uuid) -> String {
    format!("companies.{}.notifications", company_id)
}

/// Thread-safe, cloneable hub of broadcast channels keyed by topic.
///
/// Publishing to a topic nobody subscribes to is a no-op, which is exactly
/// the fire-and-forget semantics the push path wants.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    /// Create a hub with the default per-channel capacity (256 messages).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish a JSON value to a topic. No-op if no subscribers.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(value);
        }
    }

    /// Subscribe to a topic. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let hub = StreamHub::new();
        let mut rx = hub.subscribe(&company_topic(Uuid::nil())).await;

        let value = serde_json::json!({"type": "notification", "message": "hello"});
        hub.publish(&company_topic(Uuid::nil()), value.clone()).await;

        assert_eq!(rx.recv().await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let hub = StreamHub::new();
        hub.publish(BROADCAST_TOPIC, serde_json::json!({"dropped": true}))
            .await;
    }

    #[tokio::test]
    async fn test_topics_are_isolated_per_company() {
        let hub = StreamHub::new();
        let company_a = Uuid::new_v4();
        let company_b = Uuid::new_v4();
        let mut rx_a = hub.subscribe(&company_topic(company_a)).await;
        let mut rx_b = hub.subscribe(&company_topic(company_b)).await;

        hub.publish(&company_topic(company_a), serde_json::json!({"for": "a"}))
            .await;

        assert_eq!(rx_a.recv().await.unwrap()["for"], "a");
        assert!(rx_b.try_recv().is_err());
    }
}

//! Real-time push over the in-process stream hub.
//!
//! Connected company clients hold an SSE subscription to their topic; the
//! sink publishes here after a first-time persist. Nothing in this path is
//! authoritative - a company that is offline reads the row later.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::matching::models::Notification;

use super::stream_hub::{company_topic, StreamHub, BROADCAST_TOPIC};
use super::traits::BaseCompanyPush;

/// Push implementation backed by [`StreamHub`] topics.
pub struct StreamHubPush {
    hub: StreamHub,
}

impl StreamHubPush {
    pub fn new(hub: StreamHub) -> Self {
        Self { hub }
    }

    fn payload(notification: &Notification) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "type": "notification",
            "notification": serde_json::to_value(notification)?,
        }))
    }
}

#[async_trait]
impl BaseCompanyPush for StreamHubPush {
    async fn push_to_company(
        &self,
        company_id: Uuid,
        notification: &Notification,
    ) -> Result<()> {
        self.hub
            .publish(&company_topic(company_id), Self::payload(notification)?)
            .await;
        Ok(())
    }

    async fn broadcast(&self, notification: &Notification) -> Result<()> {
        self.hub
            .publish(BROADCAST_TOPIC, Self::payload(notification)?)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification() -> Notification {
        Notification {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            applicant_id: Uuid::new_v4(),
            applicant_name: "Linh Tran".to_string(),
            message: Notification::match_message("Linh Tran"),
            read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_push_reaches_company_subscriber() {
        let hub = StreamHub::new();
        let push = StreamHubPush::new(hub.clone());
        let n = notification();
        let mut rx = hub.subscribe(&company_topic(n.company_id)).await;

        push.push_to_company(n.company_id, &n).await.unwrap();

        let value = rx.recv().await.unwrap();
        assert_eq!(value["type"], "notification");
        assert_eq!(
            value["notification"]["applicantName"],
            serde_json::json!("Linh Tran")
        );
    }

    #[tokio::test]
    async fn test_broadcast_reaches_shared_topic() {
        let hub = StreamHub::new();
        let push = StreamHubPush::new(hub.clone());
        let n = notification();
        let mut rx = hub.subscribe(BROADCAST_TOPIC).await;

        push.broadcast(&n).await.unwrap();

        assert_eq!(rx.recv().await.unwrap()["type"], "notification");
    }
}

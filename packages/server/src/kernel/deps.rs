//! Server dependencies for the pipeline (using traits for testability)
//!
//! Central dependency container handed to the consumer, sink, and HTTP
//! surface. All external services sit behind trait objects so tests can
//! inject the mocks in `test_dependencies`.

use std::sync::Arc;

use crate::domains::directory::BaseProfileDirectory;

use super::nats::NatsPublisher;
use super::stream_hub::StreamHub;
use super::traits::{BaseCompanyPush, BaseNotificationStore};

/// Dependencies accessible to the pipeline components.
#[derive(Clone)]
pub struct ServerDeps {
    pub notification_store: Arc<dyn BaseNotificationStore>,
    pub profile_directory: Arc<dyn BaseProfileDirectory>,
    pub event_publisher: Arc<dyn NatsPublisher>,
    pub company_push: Arc<dyn BaseCompanyPush>,
    /// In-process pub/sub hub backing the SSE endpoints.
    pub stream_hub: StreamHub,
}

impl ServerDeps {
    pub fn new(
        notification_store: Arc<dyn BaseNotificationStore>,
        profile_directory: Arc<dyn BaseProfileDirectory>,
        event_publisher: Arc<dyn NatsPublisher>,
        company_push: Arc<dyn BaseCompanyPush>,
        stream_hub: StreamHub,
    ) -> Self {
        Self {
            notification_store,
            profile_directory,
            event_publisher,
            company_push,
            stream_hub,
        }
    }
}

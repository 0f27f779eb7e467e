pub mod consumer;
pub mod engine;
pub mod events;
pub mod models;
pub mod publisher;
pub mod sink;

// Re-export commonly used types
pub use consumer::{ApplicantEventConsumer, ConsumerSettings, EventOutcome};
pub use events::ApplicantMatchedEvent;
pub use publisher::MatchEventPublisher;
pub use sink::{NotificationSink, SinkOutcome};

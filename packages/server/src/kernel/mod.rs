// Kernel - infrastructure services shared by the pipeline and HTTP surface.
//
// Domain logic stays out of here; this is the home of the NATS abstraction,
// the stream hub, DI container, and the trait seams they plug into.

pub mod deps;
pub mod nats;
pub mod push;
pub mod stream_hub;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use nats::{ensure_pull_consumer, NatsClientPublisher, NatsPublisher, TestNats};
pub use push::StreamHubPush;
pub use stream_hub::StreamHub;
pub use traits::{BaseCompanyPush, BaseNotificationStore};

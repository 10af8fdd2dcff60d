pub mod publisher;
pub mod types;

pub use publisher::{EventListener, EventPublisher};
pub use types::{names, PlatformEvent, PublishedEvent};

//! Subscriber data and the parsed/validated types flowing between the web layer,
//! the orchestrator and the registry.

mod subscriber;
mod types;

pub use subscriber::{NewSubscriber, Subscriber, SubscriberId};
pub use types::{DataParsingError, SubscriberEmail, ValidEmail};

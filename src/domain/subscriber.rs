use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SubscriberEmail;

pub type SubscriberId = Uuid;

/// A subscriber that is about to be written to the registry.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}

impl NewSubscriber {
    pub fn new(email: SubscriberEmail, subscribed_at: DateTime<Utc>) -> Self {
        NewSubscriber {
            email,
            subscribed_at,
        }
    }
}

/// A stored subscriber record.
///
/// `name` and `confirmed` are reserved: nothing writes them yet, the registry
/// stores `None` and `false`.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: SubscriberEmail,
    pub name: Option<String>,
    pub confirmed: bool,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    /// Builds the record that gets created for `new`.
    pub fn from_new(id: SubscriberId, new: NewSubscriber) -> Self {
        Subscriber {
            id,
            email: new.email,
            name: None,
            confirmed: false,
            subscribed_at: new.subscribed_at,
        }
    }
}

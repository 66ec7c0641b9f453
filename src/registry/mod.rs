//! The subscription registry: where subscriber records live.
//!
//! Uniqueness of the email is owned by the storage. A second insert for the same address
//! fails with [`RegistryError::Conflict`], which callers treat as "already subscribed".

mod memory;
mod postgres;

pub use memory::MemoryRegistry;
pub use postgres::PgRegistry;

use async_trait::async_trait;

use crate::domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberId};

#[async_trait]
pub trait Registry: Send + Sync {
    async fn find_by_email(&self, email: &SubscriberEmail) -> RegistryResult<Option<Subscriber>>;

    /// Creates a record for `new_subscriber` and returns its id.
    /// Returns [`RegistryError::Conflict`] if the email is already stored.
    async fn insert(&self, new_subscriber: NewSubscriber) -> RegistryResult<SubscriberId>;

    async fn exists(&self, email: &SubscriberEmail) -> RegistryResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type RegistryResult<T> = core::result::Result<T, RegistryError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a subscriber with this email already exists")]
    Conflict,
    #[error("sqlx error: {0}")]
    Database(#[source] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

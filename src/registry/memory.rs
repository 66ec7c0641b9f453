use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use super::{Registry, RegistryError, RegistryResult};
use crate::domain::{NewSubscriber, Subscriber, SubscriberEmail, SubscriberId};

/// An in-process registry. Check-and-insert happens under one lock,
/// so it upholds the same uniqueness contract as the database.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    subscribers: Mutex<HashMap<SubscriberEmail, Subscriber>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, HashMap<SubscriberEmail, Subscriber>>> {
        self.subscribers
            .lock()
            .map_err(|_| RegistryError::Unexpected(anyhow!("memory registry lock poisoned")))
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn find_by_email(&self, email: &SubscriberEmail) -> RegistryResult<Option<Subscriber>> {
        Ok(self.lock()?.get(email).cloned())
    }

    async fn insert(&self, new_subscriber: NewSubscriber) -> RegistryResult<SubscriberId> {
        let mut subscribers = self.lock()?;
        if subscribers.contains_key(&new_subscriber.email) {
            return Err(RegistryError::Conflict);
        }

        let subscriber = Subscriber::from_new(Uuid::new_v4(), new_subscriber);
        let id = subscriber.id;
        subscribers.insert(subscriber.email.clone(), subscriber);

        Ok(id)
    }
}

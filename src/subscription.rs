//! The subscribe use case: validate the email, check the registry, store a new subscriber
//! and start the notifications without waiting for them.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::{
    dispatch::Notifier,
    domain::{DataParsingError, NewSubscriber, SubscriberEmail, SubscriberId},
    registry::{Registry, RegistryError},
    utils::error_chain_fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed(SubscriberId),
    AlreadySubscribed,
}

#[derive(Clone)]
pub struct SubscriptionService {
    registry: Arc<dyn Registry>,
    notifier: Notifier,
}

impl SubscriptionService {
    pub fn new(registry: Arc<dyn Registry>, notifier: Notifier) -> Self {
        SubscriptionService { registry, notifier }
    }

    /// `email` is `None` when the client did not send one.
    ///
    /// Returns once the record is stored, the welcome email and the admin alert
    /// are sent in the background and their outcome does not affect the result.
    #[tracing::instrument(name = "Subscribing", skip(self))]
    pub async fn subscribe(&self, email: Option<String>) -> Result<SubscribeOutcome, SubscribeError> {
        let email = SubscriberEmail::parse(email.unwrap_or_default())?;

        if self
            .registry
            .exists(&email)
            .await
            .map_err(SubscribeError::Registry)?
        {
            info!("Email is already subscribed");
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        let new_subscriber = NewSubscriber::new(email.clone(), Utc::now());
        let subscriber_id = match self.registry.insert(new_subscriber).await {
            Ok(id) => id,
            // Lost a race against a concurrent request for the same email.
            Err(RegistryError::Conflict) => {
                info!("Email got subscribed concurrently");
                return Ok(SubscribeOutcome::AlreadySubscribed);
            }
            Err(er) => return Err(SubscribeError::Registry(er)),
        };
        info!(%subscriber_id, "New subscriber stored");

        self.notifier.notify_new_subscriber(&email);

        Ok(SubscribeOutcome::Subscribed(subscriber_id))
    }
}

impl std::fmt::Debug for SubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("invalid subscription request: {0}")]
    Validation(#[from] DataParsingError),
    #[error("failed to access the subscription registry")]
    Registry(#[source] RegistryError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

//! Outbound notification delivery.
//!
//! A [`Dispatcher`] sends one [`Message`]. Two interchangeable backends exist, an SMTP relay
//! ([`SmtpDispatcher`]) and the SendGrid API ([`SendGridDispatcher`]); which one is used is
//! decided by `email_config.backend`. The [`Notifier`] composes the actual emails on top of it.

mod notifier;
mod sendgrid;
mod smtp;

pub use notifier::{DispatchHandles, Notifier};
pub use sendgrid::SendGridDispatcher;
pub use smtp::SmtpDispatcher;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    config::{ConfigError, EmailBackend, EmailConfig},
    domain::ValidEmail,
};

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, message: &Message) -> DispatchResult<()>;
}

/// A single outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Taken as received from the subscriber, the transport decides whether it can deliver to it.
    pub recipient: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Who the emails are sent from, e.g. `"Letterbox ✨" <news@example.com>`.
#[derive(Debug, Clone)]
pub struct Sender {
    pub name: String,
    pub addr: ValidEmail,
}

impl Sender {
    pub fn new(newsletter_name: &str, addr: ValidEmail) -> Self {
        Sender {
            name: format!("{newsletter_name} ✨"),
            addr,
        }
    }
}

/// Builds the dispatcher selected by `email_config.backend`.
/// Missing credentials or sender settings fail here, at startup.
pub fn from_config(email_config: &EmailConfig) -> DispatchResult<Arc<dyn Dispatcher>> {
    let sender = Sender::new(&email_config.newsletter_name, email_config.valid_sender()?);
    let timeout = email_config.timeout();
    info!(
        "{:<20} - Using the '{}' email backend",
        "dispatcher",
        email_config.backend.as_ref()
    );

    let dispatcher: Arc<dyn Dispatcher> = match email_config.backend {
        EmailBackend::Smtp => Arc::new(SmtpDispatcher::new(&email_config.smtp, sender, timeout)?),
        EmailBackend::SendGrid => Arc::new(SendGridDispatcher::new(
            &email_config.sendgrid.url,
            sender,
            email_config.sendgrid.api_key()?,
            timeout,
        )?),
    };

    Ok(dispatcher)
}

// ###################################
// ->   ERROR
// ###################################
pub type DispatchResult<T> = core::result::Result<T, DispatchError>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid address '{addr}': {reason}")]
    Address { addr: String, reason: String },
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("failed to build the email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("templating error: {0}")]
    Template(#[from] tera::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

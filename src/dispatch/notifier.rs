use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

use super::{DispatchResult, Dispatcher, Message};
use crate::{
    domain::{SubscriberEmail, ValidEmail},
    templ_manager::TemplateManager,
    utils::ErrorChain,
};

const ADMIN_ALERT_SUBJECT: &str = "🆕 New Newsletter Subscriber";

/// Composes the notification emails and hands them to the configured [`Dispatcher`].
#[derive(Clone)]
pub struct Notifier {
    dispatcher: Arc<dyn Dispatcher>,
    templ_mgr: TemplateManager,
    newsletter_name: Arc<str>,
    admin: ValidEmail,
}

/// The two detached sends started by [`Notifier::notify_new_subscriber`].
/// Dropping the handles does not cancel the tasks.
#[derive(Debug)]
pub struct DispatchHandles {
    pub welcome: JoinHandle<()>,
    pub admin_alert: JoinHandle<()>,
}

impl Notifier {
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        templ_mgr: TemplateManager,
        newsletter_name: &str,
        admin: ValidEmail,
    ) -> Self {
        Notifier {
            dispatcher,
            templ_mgr,
            newsletter_name: newsletter_name.into(),
            admin,
        }
    }

    /// Sends the templated welcome email to the subscriber.
    pub async fn send_welcome(&self, email: &SubscriberEmail) -> DispatchResult<()> {
        let body = self.templ_mgr.render_welcome(&self.newsletter_name)?;
        let message = Message {
            recipient: email.to_string(),
            subject: format!("🌈 Welcome to {}, you're in!", self.newsletter_name),
            text: body.text,
            html: Some(body.html),
        };

        self.dispatcher.send(&message).await
    }

    /// Lets the admin know that `subscriber_email` just subscribed.
    pub async fn send_admin_alert(&self, subscriber_email: &SubscriberEmail) -> DispatchResult<()> {
        let message = Message {
            recipient: self.admin.as_ref().to_string(),
            subject: ADMIN_ALERT_SUBJECT.to_string(),
            text: self.templ_mgr.render_admin_alert(subscriber_email.as_ref())?,
            html: None,
        };

        self.dispatcher.send(&message).await
    }

    /// Starts both notifications for a new subscriber as independent background tasks.
    /// Failures are only logged, one failing send never affects the other.
    pub fn notify_new_subscriber(&self, email: &SubscriberEmail) -> DispatchHandles {
        let welcome = {
            let notifier = self.clone();
            let email = email.clone();
            let span = info_span!("welcome_email", subscriber_email = %email);
            tokio::spawn(
                async move {
                    match notifier.send_welcome(&email).await {
                        Ok(()) => info!("Welcome email sent"),
                        Err(er) => error!(error = %ErrorChain(&er), "Failed to send the welcome email"),
                    }
                }
                .instrument(span),
            )
        };

        let admin_alert = {
            let notifier = self.clone();
            let email = email.clone();
            let span = info_span!("admin_alert", subscriber_email = %email);
            tokio::spawn(
                async move {
                    match notifier.send_admin_alert(&email).await {
                        Ok(()) => info!("Admin alert sent"),
                        Err(er) => error!(error = %ErrorChain(&er), "Failed to send the admin alert"),
                    }
                }
                .instrument(span),
            )
        };

        DispatchHandles {
            welcome,
            admin_alert,
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("newsletter_name", &self.newsletter_name)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

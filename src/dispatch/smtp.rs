use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use secrecy::ExposeSecret;

use super::{DispatchError, DispatchResult, Dispatcher, Message, Sender};
use crate::config::SmtpConfig;

/// Sends emails through an authenticated SMTP relay (`smtp.gmail.com` by default).
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpDispatcher {
    pub fn new(config: &SmtpConfig, sender: Sender, timeout: Duration) -> DispatchResult<Self> {
        let (username, password) = config.credentials()?;
        let credentials = Credentials::new(username, password.expose_secret().to_string());

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)?
            .credentials(credentials)
            .timeout(Some(timeout));
        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        Ok(SmtpDispatcher {
            transport: builder.build(),
            from: Mailbox::new(Some(sender.name), parse_address(sender.addr.as_ref())?),
        })
    }

    fn build_message(&self, message: &Message) -> DispatchResult<lettre::Message> {
        let to = Mailbox::new(None, parse_address(&message.recipient)?);
        let builder = lettre::Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject);

        let email = match &message.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                html.clone(),
            ))?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text.clone())?,
        };

        Ok(email)
    }
}

impl std::fmt::Debug for SmtpDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpDispatcher")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Dispatcher for SmtpDispatcher {
    #[tracing::instrument(
        name = "Sending an email via SMTP",
        skip(self, message),
        fields(recipient = %message.recipient)
    )]
    async fn send(&self, message: &Message) -> DispatchResult<()> {
        let email = self.build_message(message)?;
        self.transport.send(email).await?;

        Ok(())
    }
}

fn parse_address(addr: &str) -> DispatchResult<Address> {
    addr.parse().map_err(|er: lettre::address::AddressError| {
        DispatchError::Address {
            addr: addr.to_string(),
            reason: er.to_string(),
        }
    })
}

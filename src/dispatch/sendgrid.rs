use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{DispatchError, DispatchResult, Dispatcher, Message, Sender};

/// Sends emails through the SendGrid v3 mail API.
#[derive(Debug)]
pub struct SendGridDispatcher {
    http_client: Client,
    url: reqwest::Url,
    sender: Sender,
    api_key: SecretString,
}

impl SendGridDispatcher {
    pub fn new<S: AsRef<str>>(
        url: S,
        sender: Sender,
        api_key: SecretString,
        timeout: Duration,
    ) -> DispatchResult<Self> {
        let mut base =
            reqwest::Url::parse(url.as_ref()).map_err(|e| DispatchError::UrlParsing(e.to_string()))?;
        // `join` replaces the last path segment unless the base ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let url = base
            .join("v3/mail/send")
            .map_err(|e| DispatchError::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(SendGridDispatcher {
            http_client,
            url,
            sender,
            api_key,
        })
    }
}

#[async_trait]
impl Dispatcher for SendGridDispatcher {
    #[tracing::instrument(
        name = "Sending an email via SendGrid",
        skip(self, message),
        fields(recipient = %message.recipient)
    )]
    async fn send(&self, message: &Message) -> DispatchResult<()> {
        let mut content = vec![Content {
            kind: "text/plain",
            value: &message.text,
        }];
        if let Some(html) = &message.html {
            content.push(Content {
                kind: "text/html",
                value: html,
            });
        }

        let mail = SendMail {
            personalizations: [Personalization {
                to: [Address {
                    email: &message.recipient,
                    name: None,
                }],
            }],
            from: Address {
                email: self.sender.addr.as_ref(),
                name: Some(&self.sender.name),
            },
            subject: &message.subject,
            content,
        };

        self.http_client
            .post(self.url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&mail)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

// ###################################
// ->   REQUEST BODY
// ###################################
#[derive(Serialize)]
struct SendMail<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

//! Sends one test email through the configured backend and exits.
//!
//! Run with `cargo run --example test_send`. The recipient is `TEST_SEND_TO`,
//! or the admin address when it is unset.
use anyhow::Result;
use letterbox::{
    config::get_or_init_config,
    dispatch::{self, Message},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    letterbox::init_dbg_tracing();

    let email_config = &get_or_init_config().email_config;
    let dispatcher = dispatch::from_config(email_config)?;

    let recipient = match std::env::var("TEST_SEND_TO") {
        Ok(recipient) => recipient,
        Err(_) => email_config.valid_admin()?.as_ref().to_string(),
    };
    let message = Message {
        recipient: recipient.clone(),
        subject: format!("Test Email from {}", email_config.newsletter_name),
        text: format!(
            "If you see this, the '{}' email backend works!",
            email_config.backend.as_ref()
        ),
        html: None,
    };

    match dispatcher.send(&message).await {
        Ok(()) => info!("{:<20} - Test email sent to {recipient}", "test_send"),
        Err(er) => {
            error!("{:<20} - Test email to {recipient} failed: {er}", "test_send");
            return Err(er.into());
        }
    }

    Ok(())
}

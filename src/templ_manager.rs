use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use tera::{Context, Tera};
use tracing::info;

const WELCOME_HTML: &str = "welcome.html";
const WELCOME_TEXT: &str = "welcome.txt";
const ADMIN_ALERT_TEXT: &str = "admin_alert.txt";

/// The rendered bodies of a welcome email.
#[derive(Debug, Clone)]
pub struct WelcomeBody {
    pub html: String,
    pub text: String,
}

/// Renders the email templates that are compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct TemplateManager {
    tera: &'static Tera,
}

impl TemplateManager {
    pub fn init() -> Self {
        static TERA: OnceLock<Tera> = OnceLock::new();
        let tera = TERA.get_or_init(|| {
            info!(
                "{:<20} - Initializing the Template manager",
                "templ manager"
            );
            let mut tera = Tera::default();
            tera.add_raw_templates(vec![
                (WELCOME_HTML, include_str!("../templates/welcome.html")),
                (WELCOME_TEXT, include_str!("../templates/welcome.txt")),
                (ADMIN_ALERT_TEXT, include_str!("../templates/admin_alert.txt")),
            ])
            .unwrap_or_else(|e| panic!("Parsing error(s): {e}"));
            tera
        });
        Self { tera }
    }

    pub fn render_welcome(&self, newsletter_name: &str) -> Result<WelcomeBody, tera::Error> {
        let mut context = Context::new();
        context.insert("newsletter_name", newsletter_name);
        context.insert("year", &Utc::now().year());

        Ok(WelcomeBody {
            html: self.tera.render(WELCOME_HTML, &context)?,
            text: self.tera.render(WELCOME_TEXT, &context)?,
        })
    }

    pub fn render_admin_alert(&self, subscriber_email: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("subscriber_email", subscriber_email);
        self.tera.render(ADMIN_ALERT_TEXT, &context)
    }
}

//! Builds the `AppConfig` from layered sources:
//! `config/base.toml`, `config/{environment}.toml`, `APP_` prefixed environment variables
//! and finally the plain deployment variables (`PORT`, `GMAIL_USER`, `SENDGRID_API_KEY`, ...).
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod structs;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::{info, warn};

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use structs::{
    AppConfig, DbConfig, EmailBackend, EmailConfig, Environment, NetConfig, SendGridConfig,
    SmtpConfig, SslRequire,
};

/// Plain environment variables understood for deployment, and the string config key each one sets.
/// `PORT` is the only numeric one and goes through `Env` instead.
const DEPLOYMENT_ENV: [(&str, &str); 6] = [
    ("EMAIL_BACKEND", "email_config.backend"),
    ("GMAIL_USER", "email_config.smtp.username"),
    ("GMAIL_PASS", "email_config.smtp.password"),
    ("SENDGRID_API_KEY", "email_config.sendgrid.api_key"),
    ("SENDGRID_FROM_EMAIL", "email_config.sender_addr"),
    ("ADMIN_EMAIL", "email_config.admin_addr"),
];

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!("{:<20} - Initializing the configuration", "get_or_init_config");
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .unwrap_or_else(|er| panic!("Fatal Error: Parsing APP_ENVIRONMENT: {er}"));

        AppConfig::load(&config_dir, environment)
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

impl AppConfig {
    /// All the configuration sources, in the order they override each other.
    pub fn figment(config_dir: &Path, environment: Environment) -> Figment {
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut figment = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            // e.g. `APP_NET_CONFIG__APP_PORT=8080` sets `net_config.app_port`
            .merge(Env::prefixed("APP_").split("__"))
            .merge(Env::raw().filter_map(|key| {
                key.as_str()
                    .eq_ignore_ascii_case("PORT")
                    .then(|| "net_config.app_port".into())
            }));

        // Merged as strings, `Env` would turn an all-digit password into an integer.
        for (var, key) in DEPLOYMENT_ENV {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment
    }

    pub fn load(config_dir: &Path, environment: Environment) -> ConfigResult<AppConfig> {
        let mut config: AppConfig = Self::figment(config_dir, environment).extract()?;

        // A connection string always wins over the individual `db_config` settings.
        if let Some(database_url) = database_url() {
            config.db_config = DbConfig::try_from(database_url.as_str())?;
        }

        Ok(config)
    }
}

/// `DATABASE_URL`, or the older `MONGO_URI` name when only that one is set.
/// Either way it has to be a `postgres://` connection string.
fn database_url() -> Option<String> {
    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        return Some(database_url);
    }

    let mongo_uri = std::env::var("MONGO_URI").ok()?;
    warn!(
        "{:<20} - MONGO_URI is deprecated, use DATABASE_URL with a postgres:// connection string",
        "config"
    );
    Some(mongo_uri)
}

//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use lazy_regex::regex_captures;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};
use crate::domain::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
    pub email_config: EmailConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_app_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    pub require_ssl: SslRequire,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SslRequire {
    #[default]
    Prefer,
    Require,
    Disable,
}

/// Which transport delivers the notification emails.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmailBackend {
    /// An SMTP relay authenticated with an account username and password.
    Smtp,
    /// The SendGrid transactional-email API.
    SendGrid,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    /// Display name used in the `From` header and the welcome email.
    pub newsletter_name: String,
    pub sender_addr: Option<String>,
    pub admin_addr: Option<String>,
    pub timeout_millis: u64,
    pub smtp: SmtpConfig,
    pub sendgrid: SendGridConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SendGridConfig {
    pub url: String,
    pub api_key: Option<SecretString>,
}

// ###################################
// ->   IMPLs
// ###################################
impl EmailConfig {
    /// The address notifications are sent from.
    /// Falls back to the SMTP account username for the SMTP backend.
    pub fn valid_sender(&self) -> ConfigResult<ValidEmail> {
        let addr = match (&self.sender_addr, self.backend) {
            (Some(addr), _) => addr,
            (None, EmailBackend::Smtp) => self.smtp.username.as_ref().ok_or(
                ConfigError::MissingEmailSetting {
                    backend: "smtp",
                    setting: "smtp.username",
                },
            )?,
            (None, EmailBackend::SendGrid) => {
                return Err(ConfigError::MissingEmailSetting {
                    backend: "sendgrid",
                    setting: "sender_addr",
                })
            }
        };

        ValidEmail::parse(addr).map_err(|er| ConfigError::InvalidEmail(er.to_string()))
    }

    /// The address that gets an alert for every new subscriber.
    /// Falls back to the sender address.
    pub fn valid_admin(&self) -> ConfigResult<ValidEmail> {
        match &self.admin_addr {
            Some(addr) => {
                ValidEmail::parse(addr).map_err(|er| ConfigError::InvalidEmail(er.to_string()))
            }
            None => self.valid_sender(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl SmtpConfig {
    pub fn credentials(&self) -> ConfigResult<(String, SecretString)> {
        let username = self
            .username
            .clone()
            .ok_or(ConfigError::MissingEmailSetting {
                backend: "smtp",
                setting: "smtp.username",
            })?;
        let password = self
            .password
            .clone()
            .ok_or(ConfigError::MissingEmailSetting {
                backend: "smtp",
                setting: "smtp.password",
            })?;

        Ok((username, password))
    }
}

impl SendGridConfig {
    pub fn api_key(&self) -> ConfigResult<SecretString> {
        self.api_key
            .clone()
            .ok_or(ConfigError::MissingEmailSetting {
                backend: "sendgrid",
                setting: "sendgrid.api_key",
            })
    }
}

impl DbConfig {
    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        // Create new PgConnectOptions struct but don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Require => PgSslMode::Require,
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Prefer => PgSslMode::Prefer,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

impl TryFrom<&str> for DbConfig {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // postgres://{username}:{password}@{hostname}:{port}/{database}?{options}
        let (_whole, username, password, host, port, db_name, options) = regex_captures!(
            r#"^postgres(?:ql)?:\/\/([^:]+):([^@]+)@([^:\/]+):(\d+)\/([^\s\/?]+)(\?[^\s]*)?$"#,
            value
        )
        .ok_or(Self::Error::StringToDbConfigFail)?;

        let (username, db_name, host) =
            (username.to_string(), db_name.to_string(), host.to_string());
        let password = SecretString::from(password.to_string());
        let port = port
            .parse()
            .map_err(|_| Self::Error::StringToDbConfigFail)?;

        let mut require_ssl = SslRequire::default();
        if let Some(options) = options.strip_prefix('?') {
            for option in options.split(['&', ',']) {
                if let Some((id, val)) = option.split_once('=') {
                    if id == "sslmode" {
                        match val {
                            "disable" => require_ssl = SslRequire::Disable,
                            "require" => require_ssl = SslRequire::Require,
                            _ => {}
                        }
                    }
                }
            }
        }

        Ok(DbConfig {
            username,
            password,
            port,
            host,
            db_name,
            require_ssl,
        })
    }
}

// ###################################
// ->   TESTS
// ###################################

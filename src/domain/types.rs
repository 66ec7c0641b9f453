//! Parsing implementations for the email addresses this application handles, and their tests.

use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

const MAX_EMAIL_GRAPHEMES: usize = 256;

// ###################################
// ->   STRUCTS
// ###################################
/// The identity key of a subscriber as received from a client.
///
/// Only presence is enforced: the value is kept verbatim and compared by exact match,
/// so `A@x.com` and `a@x.com` are two different subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: Into<String>,
    {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        Ok(SubscriberEmail(value))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A syntactically valid email address
/// Used for the addresses this service sends from and to (sender, admin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.graphemes(true).count() > MAX_EMAIL_GRAPHEMES {
            return Err(DataParsingError::EmailTooLong);
        }

        if value.validate_email() {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid(value.to_owned()))
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is missing")]
    EmailMissing,
    #[error("email invalid: {0}")]
    EmailInvalid(String),
    #[error("email too long")]
    EmailTooLong,
}

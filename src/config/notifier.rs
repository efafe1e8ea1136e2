use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_NOTIFICATION_SUBJECT;
use crate::Error;
use crate::Result;

/// Delivery backend used by the notification gate
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    /// Write notifications to the service log only
    #[default]
    Log,
    /// POST notifications to an HTTP relay
    Webhook,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,

    /// Relay endpoint, required when `kind = "webhook"`
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Address notifications are sent from
    #[serde(default)]
    pub sender_address: String,

    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_in_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            webhook_url: None,
            sender_address: String::new(),
            subject: default_subject(),
            request_timeout_in_ms: default_request_timeout(),
        }
    }
}

impl NotifierConfig {
    /// Validates notifier configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - the subject is blank
    /// - a webhook notifier has no URL or no sender address
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(Error::InvalidConfig("notifier subject cannot be empty".into()));
        }

        if self.kind == NotifierKind::Webhook {
            match self.webhook_url.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(url) => {
                    return Err(Error::InvalidConfig(format!(
                        "webhook_url {url:?} must be an http(s) URL"
                    )));
                }
                None => {
                    return Err(Error::InvalidConfig(
                        "webhook notifier requires webhook_url".into(),
                    ));
                }
            }

            if self.sender_address.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "webhook notifier requires sender_address".into(),
                ));
            }

            if self.request_timeout_in_ms == 0 {
                return Err(Error::InvalidConfig("request_timeout_in_ms cannot be 0".into()));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_in_ms)
    }
}

fn default_subject() -> String {
    DEFAULT_NOTIFICATION_SUBJECT.to_string()
}
fn default_request_timeout() -> u64 {
    10_000
}

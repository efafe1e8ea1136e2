use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::Notifier;
use crate::DeliveryError;
use crate::Error;
use crate::NotifierConfig;
use crate::Result;

/// Hands notifications to an HTTP mail/SMS relay as JSON.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    sender_address: String,
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl WebhookNotifier {
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let url = config
            .webhook_url
            .clone()
            .ok_or_else(|| Error::InvalidConfig("webhook notifier requires webhook_url".into()))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(DeliveryError::Http)?;

        Ok(Self {
            client,
            url,
            sender_address: config.sender_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        if to.trim().is_empty() {
            return Err(DeliveryError::Rejected("empty destination address".into()).into());
        }

        let message = RelayMessage {
            from: &self.sender_address,
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&message)
            .send()
            .await
            .map_err(DeliveryError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()).into());
        }

        debug!(to, "notification handed to relay");
        Ok(())
    }
}

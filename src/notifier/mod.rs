//! Boundary to notification delivery plus the message templates.
mod log_notifier;
mod message;
mod webhook_notifier;
pub use log_notifier::*;
pub use message::*;
pub use webhook_notifier::*;


use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::NotifierConfig;
use crate::NotifierKind;
use crate::Result;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Attempts one delivery. There is no retry or rate limiting at this
    /// boundary; the caller decides what a failure means.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<()>;
}

/// Builds the notifier selected by `config.kind`
pub fn notifier_from_config(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match config.kind {
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Webhook => Arc::new(WebhookNotifier::new(config)?),
    };
    Ok(notifier)
}

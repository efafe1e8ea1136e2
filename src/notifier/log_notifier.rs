use async_trait::async_trait;
use tracing::info;

use super::Notifier;
use crate::Result;

/// Writes every notification to the service log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        info!(to, subject, "notification:\n{}", body);
        Ok(())
    }
}

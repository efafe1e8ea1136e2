use async_trait::async_trait;
use tracing::debug;

use super::SnapshotFetcher;
use crate::FetchError;
use crate::FetcherConfig;
use crate::Result;
use crate::Snapshot;

/// Reads the snapshot from a JSON feed of the form
/// `{ "<key>": { "subject": .., "available_seats": .. }, .. }`.
#[derive(Debug, Clone)]
pub struct HttpSnapshotFetcher {
    client: reqwest::Client,
    source_url: String,
}

impl HttpSnapshotFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self {
            client,
            source_url: config.source_url.clone(),
        })
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        let response = self
            .client
            .get(&self.source_url)
            .send()
            .await
            .map_err(FetchError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()).into());
        }

        let snapshot: Snapshot = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if snapshot.is_empty() {
            return Err(FetchError::EmptySnapshot.into());
        }

        debug!(courses = snapshot.len(), "snapshot fetched");
        Ok(snapshot)
    }
}

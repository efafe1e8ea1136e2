//! Boundary to the upstream resource snapshot source.
mod http_fetcher;
pub use http_fetcher::*;


use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;
use crate::Snapshot;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotFetcher: Send + Sync + 'static {
    /// Returns the current attributes of every known key.
    ///
    /// May be slow and may fail transiently. Implementations report an
    /// empty upstream listing as `FetchError::EmptySnapshot`.
    async fn fetch(&self) -> Result<Snapshot>;
}

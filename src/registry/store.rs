//! Boundary to the durable store holding the flat registry.
use crate::Result;
use crate::WatchRequest;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait RegistryStore: Send + Sync + 'static {
    /// Reads the whole registry.
    ///
    /// A missing or unreadable store yields an empty registry, never an error.
    fn load(&self) -> Vec<WatchRequest>;

    /// Overwrites the whole registry.
    fn save(
        &self,
        watches: &[WatchRequest],
    ) -> Result<()>;
}

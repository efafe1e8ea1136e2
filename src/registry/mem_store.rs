use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;

use super::RegistryStore;
use crate::Result;
use crate::WatchRequest;

/// Volatile store, for ephemeral deployments and tests.
#[derive(Debug, Default)]
pub struct MemStore {
    watches: Mutex<Vec<WatchRequest>>,
    saves: AtomicUsize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `watches`, as if persisted by an earlier run
    pub fn with_watches(watches: Vec<WatchRequest>) -> Self {
        Self {
            watches: Mutex::new(watches),
            saves: AtomicUsize::new(0),
        }
    }

    /// Last saved registry content
    pub fn saved(&self) -> Vec<WatchRequest> {
        self.watches.lock().clone()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }
}

impl RegistryStore for MemStore {
    fn load(&self) -> Vec<WatchRequest> {
        self.watches.lock().clone()
    }

    fn save(
        &self,
        watches: &[WatchRequest],
    ) -> Result<()> {
        *self.watches.lock() = watches.to_vec();
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

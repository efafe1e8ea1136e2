use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::warn;

use super::RegistryStore;
use crate::Error;
use crate::Result;
use crate::WatchRequest;

/// Insertion-ordered set of watches, unique per `(key, subscriber_email)`.
///
/// Every successful mutation is followed by a full rewrite of the store. When
/// that write fails the mutation is kept in memory and `Error::Persist` is
/// returned, so callers must treat a persist error as "applied, not saved".
pub struct WatchRegistry {
    watches: Vec<WatchRequest>,
    store: Arc<dyn RegistryStore>,
}

impl std::fmt::Debug for WatchRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("watches", &self.watches.len())
            .finish_non_exhaustive()
    }
}

impl WatchRegistry {
    /// Reads the persisted registry from `store`.
    ///
    /// Entries repeating an earlier `(key, email)` pair are dropped so the
    /// uniqueness invariant holds even for hand-edited files.
    pub fn load(store: Arc<dyn RegistryStore>) -> Self {
        let mut seen = HashSet::new();
        let mut watches = Vec::new();
        for watch in store.load() {
            if seen.insert((watch.key.clone(), watch.subscriber_email.clone())) {
                watches.push(watch);
            } else {
                warn!(
                    key = %watch.key,
                    email = %watch.subscriber_email,
                    "dropping duplicate persisted watch"
                );
            }
        }

        debug!(count = watches.len(), "watch registry loaded");
        Self { watches, store }
    }

    /// Adds a watch.
    ///
    /// # Errors
    /// - `Error::DuplicateWatch` if `(key, email)` is already present; nothing changes
    /// - `Error::Persist` if the store write failed; the watch was still added
    pub fn add(
        &mut self,
        request: WatchRequest,
    ) -> Result<()> {
        if self.contains(&request.key, &request.subscriber_email) {
            return Err(Error::DuplicateWatch {
                key: request.key,
                email: request.subscriber_email,
            });
        }

        debug!(key = %request.key, email = %request.subscriber_email, "watch added");
        self.watches.push(request);
        self.persist()
    }

    /// Removes every watch for `key` and returns how many were removed.
    pub fn remove_all(
        &mut self,
        key: &str,
    ) -> Result<usize> {
        let before = self.watches.len();
        self.watches.retain(|w| w.key != key);
        let removed = before - self.watches.len();

        if removed == 0 {
            return Ok(0);
        }

        debug!(key, removed, "watches removed");
        self.persist().map(|_| removed)
    }

    /// Removes the watch identified by `(key, email)`.
    pub fn remove_one(
        &mut self,
        key: &str,
        email: &str,
    ) -> Result<bool> {
        let Some(position) = self.watches.iter().position(|w| w.matches(key, email)) else {
            return Ok(false);
        };

        self.watches.remove(position);
        debug!(key, email, "watch removed");
        self.persist().map(|_| true)
    }

    /// Watches for `key` in insertion order; the first is the representative.
    pub fn watches_for(
        &self,
        key: &str,
    ) -> Vec<WatchRequest> {
        self.watches.iter().filter(|w| w.key == key).cloned().collect()
    }

    /// First watch registered for `key`
    pub fn representative(
        &self,
        key: &str,
    ) -> Option<&WatchRequest> {
        self.watches.iter().find(|w| w.key == key)
    }

    pub fn contains(
        &self,
        key: &str,
        email: &str,
    ) -> bool {
        self.watches.iter().any(|w| w.matches(key, email))
    }

    pub fn has_key(
        &self,
        key: &str,
    ) -> bool {
        self.watches.iter().any(|w| w.key == key)
    }

    /// Distinct keys in order of first appearance
    pub fn keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.watches
            .iter()
            .filter(|w| seen.insert(w.key.as_str()))
            .map(|w| w.key.clone())
            .collect()
    }

    pub fn watches(&self) -> &[WatchRequest] {
        &self.watches
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.watches).inspect_err(|e| {
            error!("failed to persist watch registry: {}", e);
        })
    }
}

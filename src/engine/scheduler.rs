use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

use super::PollerExit;

/// Identity handed to a freshly spawned poller.
///
/// The generation lets an exiting poller clear its own monitor entry without
/// touching the entry of a newer poller for the same key.
#[derive(Debug, Clone)]
pub struct PollerTicket {
    pub key: String,
    pub generation: u64,
    pub token: CancellationToken,
}

#[derive(Debug)]
pub struct MonitorHandle {
    pub key: String,
    pub generation: u64,
    token: CancellationToken,
    handle: JoinHandle<PollerExit>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub joined: usize,
    pub aborted: usize,
}

/// Active monitors: at most one running poller per key.
#[derive(Debug, Default)]
pub struct PollScheduler {
    monitors: HashMap<String, MonitorHandle>,
    next_generation: u64,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a poller for `key` unless one is already registered.
    ///
    /// Returns whether a poller was spawned. Must be called from within a
    /// tokio runtime.
    pub fn ensure_running<F, Fut>(
        &mut self,
        key: &str,
        spawn: F,
    ) -> bool
    where
        F: FnOnce(PollerTicket) -> Fut,
        Fut: Future<Output = PollerExit> + Send + 'static,
    {
        if self.monitors.contains_key(key) {
            return false;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let token = CancellationToken::new();
        let ticket = PollerTicket {
            key: key.to_string(),
            generation,
            token: token.clone(),
        };

        let handle = tokio::spawn(spawn(ticket));
        debug!(key, generation, "poller spawned");

        self.monitors.insert(
            key.to_string(),
            MonitorHandle {
                key: key.to_string(),
                generation,
                token,
                handle,
            },
        );
        true
    }

    /// Cancels and forgets the poller for `key`. Idempotent.
    pub fn stop(
        &mut self,
        key: &str,
    ) -> bool {
        match self.monitors.remove(key) {
            Some(monitor) => {
                monitor.token.cancel();
                debug!(key, generation = monitor.generation, "poller stopped");
                true
            }
            None => false,
        }
    }

    /// Removes the entry for `key` only if it still belongs to `generation`.
    pub fn finish(
        &mut self,
        key: &str,
        generation: u64,
    ) -> bool {
        match self.monitors.get(key) {
            Some(monitor) if monitor.generation == generation => {
                self.monitors.remove(key);
                true
            }
            Some(monitor) => {
                debug!(
                    key,
                    generation,
                    current = monitor.generation,
                    "stale poller finished, newer generation kept"
                );
                false
            }
            None => false,
        }
    }

    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.monitors.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub(crate) fn generation_of(
        &self,
        key: &str,
    ) -> Option<u64> {
        self.monitors.get(key).map(|m| m.generation)
    }

    pub fn is_running(
        &self,
        key: &str,
    ) -> bool {
        self.monitors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Cancels every poller and hands back their handles.
    ///
    /// The handles are joined by [`shutdown_monitors`] outside the engine lock.
    pub fn drain(&mut self) -> Vec<MonitorHandle> {
        let monitors: Vec<MonitorHandle> = self.monitors.drain().map(|(_, m)| m).collect();
        for monitor in &monitors {
            monitor.token.cancel();
        }
        monitors
    }
}

/// Waits up to `timeout` for drained pollers to exit, then aborts the rest.
pub async fn shutdown_monitors(
    monitors: Vec<MonitorHandle>,
    timeout: Duration,
) -> ShutdownReport {
    let total = monitors.len();
    let abort_handles: Vec<_> = monitors.iter().map(|m| m.handle.abort_handle()).collect();
    let handles: Vec<_> = monitors.into_iter().map(|m| m.handle).collect();

    match tokio::time::timeout(timeout, futures::future::join_all(handles)).await {
        Ok(_) => ShutdownReport {
            joined: total,
            aborted: 0,
        },
        Err(_) => {
            let pending: Vec<_> = abort_handles.into_iter().filter(|h| !h.is_finished()).collect();
            for handle in &pending {
                handle.abort();
            }
            warn!(aborted = pending.len(), ?timeout, "pollers did not stop in time, aborted");
            ShutdownReport {
                joined: total - pending.len(),
                aborted: pending.len(),
            }
        }
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::fetch_with_timeout;
use super::shutdown_monitors;
use super::NotificationGate;
use super::PollScheduler;
use super::Poller;
use super::ShutdownReport;
use crate::constants::MAX_SIMILAR_KEYS;
use crate::is_plausible_email;
use crate::metrics;
use crate::similar_keys;
use crate::test_message;
use crate::utils::time::get_now_as_millis;
use crate::CourseAttributes;
use crate::Error;
use crate::PollerConfig;
use crate::Result;
use crate::SnapshotFetcher;
use crate::Submission;
use crate::ValidationError;
use crate::WatchRegistry;
use crate::WatchRequest;

/// Registry and active monitors, always mutated together under one lock.
#[derive(Debug)]
pub(crate) struct EngineState {
    pub(crate) registry: WatchRegistry,
    pub(crate) scheduler: PollScheduler,
}

impl EngineState {
    pub(crate) fn new(registry: WatchRegistry) -> Self {
        Self {
            registry,
            scheduler: PollScheduler::new(),
        }
    }

    pub(crate) fn observe(&self) {
        metrics::observe_state(self.registry.len(), self.scheduler.len());
    }
}

pub(crate) struct EngineShared {
    pub(crate) state: Mutex<EngineState>,
    pub(crate) fetcher: Arc<dyn SnapshotFetcher>,
    pub(crate) gate: NotificationGate,
    pub(crate) poller_config: PollerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub watches: Vec<WatchRequest>,
    pub active_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub watches: usize,
    pub keys: usize,
    pub active_pollers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLookup {
    pub key: String,
    pub course: Option<CourseAttributes>,
    pub similar: Vec<String>,
}

/// Entry point for submissions, cancellations and the admin queries.
///
/// Cloning is cheap; every clone drives the same registry and pollers.
#[derive(Clone)]
pub struct WatchEngine {
    shared: Arc<EngineShared>,
}

impl std::fmt::Debug for WatchEngine {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("WatchEngine").finish_non_exhaustive()
    }
}

impl WatchEngine {
    pub(crate) fn from_parts(
        state: EngineState,
        fetcher: Arc<dyn SnapshotFetcher>,
        gate: NotificationGate,
        poller_config: PollerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                state: Mutex::new(state),
                fetcher,
                gate,
                poller_config,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }

    /// Restores one poller per persisted key, bound to the key's first watch.
    ///
    /// Returns the number of pollers spawned.
    pub fn start(&self) -> usize {
        let mut state = self.shared.state.lock();
        let representatives: Vec<WatchRequest> = state
            .registry
            .keys()
            .iter()
            .filter_map(|key| state.registry.representative(key).cloned())
            .collect();

        let spawned = representatives
            .into_iter()
            .filter(|representative| self.ensure_poller(&mut state, representative.clone()))
            .count();
        state.observe();

        info!(watches = state.registry.len(), spawned, "watch engine started");
        spawned
    }

    /// Validates and registers a new watch, starting a poller for its key if needed.
    ///
    /// A persistence failure is returned after the watch is registered and
    /// monitored; the in-memory registry stays authoritative.
    pub async fn submit(
        &self,
        submission: Submission,
    ) -> Result<WatchRequest> {
        let submission = submission.normalized()?;

        if self.shared.state.lock().registry.contains(&submission.key, &submission.email) {
            return Err(Error::DuplicateWatch {
                key: submission.key,
                email: submission.email,
            });
        }

        let snapshot = fetch_with_timeout(self.shared.fetcher.as_ref(), self.shared.poller_config.fetch_timeout())
            .await
            .inspect_err(|e| warn!(key = %submission.key, "submission snapshot unavailable: {}", e))?;
        let Some(course) = snapshot.get(&submission.key).cloned() else {
            return Err(ValidationError::UnknownKey(submission.key).into());
        };

        let request = WatchRequest {
            subscriber_name: submission.name,
            subscriber_email: submission.email,
            subscriber_phone: submission.phone,
            key: submission.key,
            submitted_at: get_now_as_millis(),
            snapshot_at_submission: course,
        };

        let mut state = self.shared.state.lock();
        let persisted = match state.registry.add(request.clone()) {
            Ok(()) => Ok(()),
            Err(e) if e.is_persist() => Err(e),
            Err(e) => return Err(e),
        };

        let representative = state
            .registry
            .representative(&request.key)
            .cloned()
            .unwrap_or_else(|| request.clone());
        self.ensure_poller(&mut state, representative);
        state.observe();
        drop(state);

        info!(key = %request.key, email = %request.subscriber_email, "watch submitted");
        persisted.map(|_| request)
    }

    /// Removes the `(key, email)` watch and stops the key's poller once no
    /// watches remain. Returns whether a watch was removed.
    pub fn cancel(
        &self,
        key: &str,
        email: &str,
    ) -> Result<bool> {
        let key = key.trim();
        let email = email.trim();

        let mut state = self.shared.state.lock();
        let removed = state.registry.remove_one(key, email);

        if !state.registry.has_key(key) && state.scheduler.stop(key) {
            info!(key, "last watch cancelled, poller stopped");
        }
        state.observe();

        debug!(key, email, ?removed, "cancel processed");
        removed
    }

    pub fn status(&self) -> EngineStatus {
        let state = self.shared.state.lock();
        EngineStatus {
            watches: state.registry.watches().to_vec(),
            active_keys: state.scheduler.active_keys(),
        }
    }

    pub fn health(&self) -> HealthReport {
        let state = self.shared.state.lock();
        HealthReport {
            watches: state.registry.len(),
            keys: state.registry.keys().len(),
            active_pollers: state.scheduler.len(),
        }
    }

    pub fn is_monitoring(
        &self,
        key: &str,
    ) -> bool {
        self.shared.state.lock().scheduler.is_running(key)
    }

    /// Looks a key up in a fresh snapshot, suggesting similar keys on a miss.
    pub async fn lookup(
        &self,
        key: &str,
    ) -> Result<CourseLookup> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::MissingField("key").into());
        }

        let snapshot =
            fetch_with_timeout(self.shared.fetcher.as_ref(), self.shared.poller_config.fetch_timeout()).await?;
        let course = snapshot.get(key).cloned();
        let similar = match course {
            Some(_) => Vec::new(),
            None => similar_keys(&snapshot, key, MAX_SIMILAR_KEYS),
        };

        Ok(CourseLookup {
            key: key.to_string(),
            course,
            similar,
        })
    }

    /// Sends a fixed configuration-check message through the notifier.
    pub async fn send_test_notification(
        &self,
        address: &str,
    ) -> Result<()> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::MissingField("address").into());
        }
        if !is_plausible_email(address) {
            return Err(ValidationError::MalformedEmail(address.to_string()).into());
        }

        let message = test_message();
        self.shared
            .gate
            .notifier()
            .send(address, &message.subject, &message.body)
            .await
            .inspect(|_| info!(address, "test notification delivered"))
            .inspect_err(|e| warn!(address, "test notification failed: {}", e))
    }

    /// Stops every poller. Watches stay registered for the next start.
    pub async fn shutdown(&self) -> ShutdownReport {
        let monitors = {
            let mut state = self.shared.state.lock();
            let monitors = state.scheduler.drain();
            state.observe();
            monitors
        };

        let report = shutdown_monitors(monitors, self.shared.poller_config.shutdown_timeout()).await;
        info!(joined = report.joined, aborted = report.aborted, "watch engine stopped");
        report
    }

    fn ensure_poller(
        &self,
        state: &mut EngineState,
        representative: WatchRequest,
    ) -> bool {
        let shared = self.shared.clone();
        let key = representative.key.clone();
        state
            .scheduler
            .ensure_running(&key, move |ticket| Poller::new(ticket, representative, shared).run())
    }
}

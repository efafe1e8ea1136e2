use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::EngineShared;
use super::PollerTicket;
use super::ResolveOutcome;
use crate::metrics::FETCH_FAILURES;
use crate::FetchError;
use crate::Result;
use crate::Snapshot;
use crate::SnapshotFetcher;
use crate::WatchRequest;

/// Terminal state of a poller task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerExit {
    /// Availability observed and handed to the notification gate
    Resolved(ResolveOutcome),
    /// Stopped by the scheduler, nothing was notified
    Cancelled,
}

/// Per-key fetch-evaluate-notify loop.
///
/// Fetch failures never end the loop; only availability or cancellation do.
pub(crate) struct Poller {
    ticket: PollerTicket,
    representative: WatchRequest,
    shared: Arc<EngineShared>,
}

impl Poller {
    pub(crate) fn new(
        ticket: PollerTicket,
        representative: WatchRequest,
        shared: Arc<EngineShared>,
    ) -> Self {
        Self {
            ticket,
            representative,
            shared,
        }
    }

    pub(crate) async fn run(self) -> PollerExit {
        let key = self.ticket.key.as_str();
        let generation = self.ticket.generation;
        let token = &self.ticket.token;
        info!(key, generation, "poller running");

        let mut cycle: u64 = 0;
        loop {
            if token.is_cancelled() {
                debug!(key, generation, cycle, "poller cancelled");
                return PollerExit::Cancelled;
            }
            cycle += 1;

            let fetched = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(key, generation, cycle, "poller cancelled during fetch");
                    return PollerExit::Cancelled;
                }
                result = fetch_with_timeout(self.shared.fetcher.as_ref(), self.shared.poller_config.fetch_timeout()) => result,
            };

            match fetched {
                Ok(snapshot) => match snapshot.get(key) {
                    Some(course) if course.is_available() => {
                        info!(key, generation, cycle, seats = course.available_seats, "seats available");
                        let outcome = self
                            .shared
                            .gate
                            .resolve(&self.shared.state, &self.ticket, &self.representative, course)
                            .await;
                        return PollerExit::Resolved(outcome);
                    }
                    Some(course) => {
                        debug!(key, cycle, seats = course.available_seats, "no seats available");
                    }
                    None => {
                        debug!(key, cycle, "key missing from snapshot");
                    }
                },
                Err(e) => {
                    FETCH_FAILURES.inc();
                    warn!(key, cycle, "snapshot fetch failed, retrying next cycle: {}", e);
                }
            }

            let delay = next_delay(self.shared.poller_config.poll_interval(), self.shared.poller_config.jitter());
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(key, generation, cycle, "poller cancelled while sleeping");
                    return PollerExit::Cancelled;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

/// Fetches a snapshot, treating an overrun of `timeout` as a fetch failure.
pub(crate) async fn fetch_with_timeout(
    fetcher: &dyn SnapshotFetcher,
    timeout: Duration,
) -> Result<Snapshot> {
    match tokio::time::timeout(timeout, fetcher.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout).into()),
    }
}

pub(crate) fn next_delay(
    interval: Duration,
    jitter: Duration,
) -> Duration {
    let jitter_ms = jitter.as_millis() as u64;
    if jitter_ms == 0 {
        return interval;
    }
    interval + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
}

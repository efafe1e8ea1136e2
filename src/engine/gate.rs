use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::EngineState;
use super::PollerTicket;
use crate::metrics::record_notification;
use crate::metrics::OUTCOME_DELIVERED;
use crate::metrics::OUTCOME_FAILED;
use crate::seat_available_message;
use crate::CourseAttributes;
use crate::FanOut;
use crate::Notifier;
use crate::WatchRequest;

/// What a resolution did to the engine state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// At least one notification went out. `removed` watches left the registry.
    Notified { delivered: usize, removed: usize },
    /// Every delivery attempt failed; watches stay in the registry unpolled.
    DeliveryFailed,
    /// The poller was cancelled before delivery started.
    Superseded,
}

/// Sends the single notification round for a key and resolves its watches.
pub struct NotificationGate {
    notifier: Arc<dyn Notifier>,
    fan_out: FanOut,
    subject: String,
}

impl std::fmt::Debug for NotificationGate {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("NotificationGate")
            .field("fan_out", &self.fan_out)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl NotificationGate {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        fan_out: FanOut,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            fan_out,
            subject: subject.into(),
        }
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Delivers first, then mutates the registry under the engine lock.
    pub(crate) async fn resolve(
        &self,
        state: &Mutex<EngineState>,
        ticket: &PollerTicket,
        representative: &WatchRequest,
        course: &CourseAttributes,
    ) -> ResolveOutcome {
        let key = ticket.key.as_str();
        if ticket.token.is_cancelled() {
            info!(key, generation = ticket.generation, "resolution superseded by cancellation");
            return ResolveOutcome::Superseded;
        }

        let recipients = self.recipients(state, key, representative);
        let delivered = self.deliver(&recipients, course).await;

        let mut guard = state.lock();
        if delivered == 0 {
            error!(
                key,
                generation = ticket.generation,
                "notification undeliverable, watches kept without a poller"
            );
            guard.scheduler.finish(key, ticket.generation);
            guard.observe();
            return ResolveOutcome::DeliveryFailed;
        }

        // A newer poller owns the key: only the notified watches are resolved.
        let superseded = guard
            .scheduler
            .generation_of(key)
            .is_some_and(|generation| generation != ticket.generation);
        let (removed, persisted) = if superseded {
            info!(key, delivered, "newer poller owns the key, removing notified watches only");
            let mut removed = 0;
            let mut persisted = Ok(());
            for watch in &recipients {
                match guard.registry.remove_one(key, &watch.subscriber_email) {
                    Ok(true) => removed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        removed += 1;
                        persisted = Err(e);
                    }
                }
            }
            (removed, persisted)
        } else {
            let pending = guard.registry.watches_for(key).len();
            match guard.registry.remove_all(key) {
                Ok(removed) => (removed, Ok(())),
                Err(e) => (pending, Err(e)),
            }
        };
        if let Err(e) = persisted {
            error!(key, "resolved watches removed but not persisted: {}", e);
        }
        guard.scheduler.finish(key, ticket.generation);
        guard.observe();
        drop(guard);

        if self.fan_out == FanOut::Representative && removed > 1 {
            warn!(
                key,
                dropped = removed - 1,
                "other subscribers of this key were resolved without a notification"
            );
        }
        info!(key, delivered, removed, "key resolved");

        ResolveOutcome::Notified { delivered, removed }
    }

    /// Representative mode reads the key's current first watch rather than the
    /// copy bound at spawn time, so a cancelled subscriber is never notified.
    fn recipients(
        &self,
        state: &Mutex<EngineState>,
        key: &str,
        representative: &WatchRequest,
    ) -> Vec<WatchRequest> {
        let guard = state.lock();
        match self.fan_out {
            FanOut::Representative => vec![guard
                .registry
                .representative(key)
                .cloned()
                .unwrap_or_else(|| representative.clone())],
            FanOut::AllSubscribers => {
                let watches = guard.registry.watches_for(key);
                if watches.is_empty() {
                    vec![representative.clone()]
                } else {
                    watches
                }
            }
        }
    }

    async fn deliver(
        &self,
        recipients: &[WatchRequest],
        course: &CourseAttributes,
    ) -> usize {
        let sends = recipients.iter().map(|watch| async move {
            let message = seat_available_message(&self.subject, watch, course);
            match self
                .notifier
                .send(&watch.subscriber_email, &message.subject, &message.body)
                .await
            {
                Ok(()) => {
                    record_notification(OUTCOME_DELIVERED);
                    info!(key = %watch.key, email = %watch.subscriber_email, "notification delivered");
                    true
                }
                Err(e) => {
                    record_notification(OUTCOME_FAILED);
                    error!(
                        key = %watch.key,
                        email = %watch.subscriber_email,
                        "notification delivery failed: {}",
                        e
                    );
                    false
                }
            }
        });

        join_all(sends).await.into_iter().filter(|ok| *ok).count()
    }
}

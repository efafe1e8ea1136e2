use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::DeliveryError;
use crate::FetchError;
use crate::Notifier;
use crate::Result;
use crate::Snapshot;
use crate::SnapshotFetcher;

#[derive(Debug, Clone)]
pub(crate) enum FetchStep {
    Snapshot(Snapshot),
    Fail,
    Hang,
}

#[derive(Debug)]
pub(crate) struct ScriptedFetcher {
    queued: Mutex<VecDeque<FetchStep>>,
    current: Mutex<FetchStep>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new(current: FetchStep) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            current: Mutex::new(current),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers `steps` in order, then repeats `then`
    pub(crate) fn sequence(
        steps: Vec<FetchStep>,
        then: FetchStep,
    ) -> Self {
        let fetcher = Self::new(then);
        fetcher.queued.lock().extend(steps);
        fetcher
    }

    pub(crate) fn set(
        &self,
        step: FetchStep,
    ) {
        self.queued.lock().clear();
        *self.current.lock() = step;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotFetcher for ScriptedFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = match self.queued.lock().pop_front() {
            Some(step) => step,
            None => self.current.lock().clone(),
        };

        match step {
            FetchStep::Snapshot(snapshot) => Ok(snapshot),
            FetchStep::Fail => Err(FetchError::Status(503).into()),
            FetchStep::Hang => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentMessage {
    pub(crate) to: String,
    pub(crate) subject: String,
    pub(crate) body: String,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
    delay: Duration,
}

impl RecordingNotifier {
    pub(crate) fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    /// Each send takes `delay` before it is recorded.
    pub(crate) fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub(crate) fn set_failing(
        &self,
        failing: bool,
    ) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected(format!("relay refused {to}")).into());
        }

        self.sent.lock().push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

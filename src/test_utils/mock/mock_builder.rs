use std::sync::Arc;

use super::FetchStep;
use super::RecordingNotifier;
use super::ScriptedFetcher;
use crate::test_utils::test_config;
use crate::EngineBuilder;
use crate::MemStore;
use crate::SeatWatchConfig;
use crate::WatchEngine;
use crate::WatchRequest;

/// Engine wired to scripted collaborators, with handles kept for assertions.
pub(crate) struct TestEngine {
    pub(crate) engine: WatchEngine,
    pub(crate) fetcher: Arc<ScriptedFetcher>,
    pub(crate) notifier: Arc<RecordingNotifier>,
    pub(crate) store: Arc<MemStore>,
}

pub(crate) struct MockBuilder {
    config: SeatWatchConfig,
    fetcher: Option<ScriptedFetcher>,
    notifier: Option<RecordingNotifier>,
    watches: Vec<WatchRequest>,
}

impl MockBuilder {
    pub(crate) fn new() -> Self {
        Self {
            config: test_config(),
            fetcher: None,
            notifier: None,
            watches: Vec::new(),
        }
    }

    pub(crate) fn with_fetcher(
        mut self,
        fetcher: ScriptedFetcher,
    ) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub(crate) fn with_notifier(
        mut self,
        notifier: RecordingNotifier,
    ) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub(crate) fn with_persisted(
        mut self,
        watches: Vec<WatchRequest>,
    ) -> Self {
        self.watches = watches;
        self
    }

    pub(crate) fn build(self) -> TestEngine {
        let fetcher = Arc::new(
            self.fetcher
                .unwrap_or_else(|| ScriptedFetcher::new(FetchStep::Snapshot(Default::default()))),
        );
        let notifier = Arc::new(self.notifier.unwrap_or_default());
        let store = Arc::new(MemStore::with_watches(self.watches));

        let engine = EngineBuilder::new(self.config)
            .fetcher(fetcher.clone())
            .notifier(notifier.clone())
            .store(store.clone())
            .build()
            .expect("engine builds from test collaborators");

        TestEngine {
            engine,
            fetcher,
            notifier,
            store,
        }
    }
}

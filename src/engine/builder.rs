//! Assembles a [`WatchEngine`] from configuration.
//!
//! Every collaborator has a production default derived from
//! [`SeatWatchConfig`]; tests and embedders swap them through the setters.
//!
//! ```ignore
//! let engine = EngineBuilder::new(config)
//!     .store(Arc::new(MemStore::new())) // optional override
//!     .build()?;
//! engine.start();
//! ```

use std::sync::Arc;

use tracing::debug;

use super::EngineState;
use super::NotificationGate;
use super::WatchEngine;
use crate::notifier_from_config;
use crate::HttpSnapshotFetcher;
use crate::JsonFileStore;
use crate::Notifier;
use crate::RegistryStore;
use crate::Result;
use crate::SeatWatchConfig;
use crate::SnapshotFetcher;
use crate::WatchRegistry;

pub struct EngineBuilder {
    config: SeatWatchConfig,
    fetcher: Option<Arc<dyn SnapshotFetcher>>,
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn RegistryStore>>,
}

impl EngineBuilder {
    pub fn new(config: SeatWatchConfig) -> Self {
        Self {
            config,
            fetcher: None,
            notifier: None,
            store: None,
        }
    }

    pub fn fetcher(
        mut self,
        fetcher: Arc<dyn SnapshotFetcher>,
    ) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn notifier(
        mut self,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn store(
        mut self,
        store: Arc<dyn RegistryStore>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    /// Loads the persisted registry and wires the engine. Pollers are not
    /// spawned until [`WatchEngine::start`].
    pub fn build(self) -> Result<WatchEngine> {
        let fetcher: Arc<dyn SnapshotFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpSnapshotFetcher::new(&self.config.fetcher)?),
        };
        let notifier = match self.notifier {
            Some(notifier) => notifier,
            None => notifier_from_config(&self.config.notifier)?,
        };
        let store: Arc<dyn RegistryStore> = match self.store {
            Some(store) => store,
            None => Arc::new(JsonFileStore::new(self.config.storage.registry_path.clone())),
        };

        let registry = WatchRegistry::load(store);
        debug!(watches = registry.len(), "engine registry ready");

        let gate = NotificationGate::new(
            notifier,
            self.config.resolution.fan_out,
            self.config.notifier.subject.clone(),
        );

        Ok(WatchEngine::from_parts(
            EngineState::new(registry),
            fetcher,
            gate,
            self.config.poller.clone(),
        ))
    }
}

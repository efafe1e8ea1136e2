//! Configuration management module for the seat watch service.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Section-wise validation
mod fetcher;
mod notifier;
mod poller;
mod resolution;
mod service;
mod storage;
pub use fetcher::*;
pub use notifier::*;
pub use poller::*;
pub use resolution::*;
pub use service::*;
pub use storage::*;

use std::env;
use std::fmt::Debug;
use std::path::Path;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Environment variable naming an extra configuration file
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Prefix of every configuration environment variable, e.g.
/// `SEATWATCH__POLLER__POLL_INTERVAL_IN_SECS`
pub const ENV_PREFIX: &str = "SEATWATCH";

/// Main configuration container for the seat watch service
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct SeatWatchConfig {
    /// Process level settings: logging and the admin surface
    #[serde(default)]
    pub service: ServiceConfig,
    /// Where the watch registry is persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Poller cadence and timeouts
    #[serde(default)]
    pub poller: PollerConfig,
    /// Upstream snapshot source
    #[serde(default)]
    pub fetcher: FetcherConfig,
    /// Notification delivery
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// What happens to a key's watches once availability is observed
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl Debug for SeatWatchConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SeatWatchConfig")
            .field("service", &self.service)
            .field("storage", &self.storage)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

impl SeatWatchConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `SEATWATCH__` prefix (highest priority)
    ///
    /// # Note
    /// This method does NOT validate the configuration. Callers MUST call `validate()`
    /// before using the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/seatwatch.toml");
    /// std::env::set_var("SEATWATCH__POLLER__POLL_INTERVAL_IN_SECS", "60");
    /// let cfg = SeatWatchConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` from the first section that fails.
    pub fn validate(self) -> Result<Self> {
        self.service.validate()?;
        self.storage.validate()?;
        self.poller.validate()?;
        self.fetcher.validate()?;
        self.notifier.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

/// Ensures directory path is usable: non-empty and (outside tests) creatable
/// and writable.
pub(crate) fn validate_directory(
    path: &Path,
    name: &str,
) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidConfig(format!("{name} path cannot be empty")));
    }

    #[cfg(not(test))]
    {
        use std::fs;
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| {
                Error::InvalidConfig(format!(
                    "Failed to create {} directory at {}: {}",
                    name,
                    path.display(),
                    e
                ))
            })?;
        }

        let test_file = path.join(".permission_test");
        fs::write(&test_file, b"test").map_err(|e| {
            Error::InvalidConfig(format!(
                "No write permission in {} directory {}: {}",
                name,
                path.display(),
                e
            ))
        })?;
        fs::remove_file(&test_file).ok();
    }

    Ok(())
}

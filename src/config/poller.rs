use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_FETCH_TIMEOUT_IN_MS;
use crate::constants::DEFAULT_POLL_INTERVAL_IN_SECS;
use crate::constants::DEFAULT_SHUTDOWN_TIMEOUT_IN_MS;
use crate::Error;
use crate::Result;

/// Cadence of the per-key pollers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollerConfig {
    /// Sleep between two fetch cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_in_secs: u64,

    /// Upper bound for one snapshot fetch; a timeout counts as a failed cycle
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_in_ms: u64,

    /// Uniform random delay added to each sleep (0 disables jitter)
    #[serde(default)]
    pub jitter_in_ms: u64,

    /// How long shutdown waits for pollers before aborting them
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_in_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_in_secs: default_poll_interval(),
            fetch_timeout_in_ms: default_fetch_timeout(),
            jitter_in_ms: 0,
            shutdown_timeout_in_ms: default_shutdown_timeout(),
        }
    }
}

impl PollerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_in_secs == 0 {
            return Err(Error::InvalidConfig("poll_interval_in_secs cannot be 0".into()));
        }

        if self.fetch_timeout_in_ms == 0 {
            return Err(Error::InvalidConfig("fetch_timeout_in_ms cannot be 0".into()));
        }

        if self.jitter_in_ms >= self.poll_interval_in_secs.saturating_mul(1000) {
            return Err(Error::InvalidConfig(format!(
                "jitter {}ms should be less than poll interval {}s",
                self.jitter_in_ms, self.poll_interval_in_secs
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_in_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_in_ms)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_in_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_in_ms)
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_IN_SECS
}
fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_IN_MS
}
fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_IN_MS
}

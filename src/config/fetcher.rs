use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Upstream snapshot source settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetcherConfig {
    /// JSON feed mapping each key to its course attributes
    #[serde(default = "default_source_url")]
    pub source_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_in_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            request_timeout_in_ms: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetcherConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.source_url.starts_with("http://") || self.source_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "source_url {:?} must be an http(s) URL",
                self.source_url
            )));
        }

        if self.request_timeout_in_ms == 0 {
            return Err(Error::InvalidConfig("request_timeout_in_ms cannot be 0".into()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_in_ms)
    }
}

fn default_source_url() -> String {
    "http://127.0.0.1:8089/courses.json".to_string()
}
fn default_request_timeout() -> u64 {
    30_000
}
fn default_user_agent() -> String {
    concat!("seatwatch/", env!("CARGO_PKG_VERSION")).to_string()
}

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::validate_directory;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Directory receiving the rolling service log
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Whether the HTTP admin surface is started
    #[serde(default = "default_admin_enabled")]
    pub admin_enabled: bool,

    #[serde(default = "default_admin_listen_address")]
    pub admin_listen_address: SocketAddr,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            admin_enabled: default_admin_enabled(),
            admin_listen_address: default_admin_listen_address(),
        }
    }
}

impl ServiceConfig {
    /// Validates service configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - the admin surface is enabled on port 0
    /// - the log directory is unusable
    pub fn validate(&self) -> Result<()> {
        if self.admin_enabled && self.admin_listen_address.port() == 0 {
            return Err(Error::InvalidConfig(
                "admin_listen_address must specify a non-zero port".into(),
            ));
        }

        validate_directory(&self.log_dir, "log_dir")
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/tmp/seatwatch/logs")
}
fn default_admin_enabled() -> bool {
    true
}
fn default_admin_listen_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8088))
}

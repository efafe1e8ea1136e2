use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::validate_directory;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the whole watch registry
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.registry_path.file_name().is_none() {
            return Err(Error::InvalidConfig(format!(
                "registry_path {} does not name a file",
                self.registry_path.display()
            )));
        }

        match self.registry_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => validate_directory(parent, "registry_path parent"),
            _ => Ok(()),
        }
    }
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("/tmp/seatwatch/registry.json")
}

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use super::RegistryStore;
use crate::file_io::write_atomically;
use crate::PersistError;
use crate::Result;
use crate::WatchRequest;

/// Persists the registry as one pretty-printed JSON array.
///
/// The file is replaced atomically on every save. There is no schema
/// version; an unreadable file is treated as an empty registry.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Vec<WatchRequest> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no registry file yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "registry file unreadable, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<WatchRequest>>(&raw) {
            Ok(watches) => {
                debug!(path = %self.path.display(), count = watches.len(), "registry loaded");
                watches
            }
            Err(e) => {
                warn!(path = %self.path.display(), "registry file corrupt, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(
        &self,
        watches: &[WatchRequest],
    ) -> Result<()> {
        let buf = serde_json::to_vec_pretty(watches).map_err(PersistError::Serialize)?;

        write_atomically(&self.path, &buf).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

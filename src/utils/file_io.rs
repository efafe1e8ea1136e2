use std::fs::create_dir_all;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;

use crate::constants::REGISTRY_TEMP_SUFFIX;

pub(crate) fn create_parent_dir_if_not_exist(path: &Path) -> std::io::Result<()> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            if let Err(e) = create_dir_all(parent_dir) {
                error!("Failed to create directory {:?}: {:?}", parent_dir, e);
                return Err(e);
            }
            debug!("created successfully: {:?}", parent_dir);
        }
    }
    Ok(())
}

pub fn open_file_for_append(path: &Path) -> std::io::Result<File> {
    create_parent_dir_if_not_exist(path)?;
    OpenOptions::new().append(true).create(true).open(path)
}

/// Sibling path used while a file is being replaced
pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(REGISTRY_TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Replaces the content of `path` with `buf`.
///
/// The bytes are written and synced to a sibling temp file which is then
/// renamed over `path`, so readers never observe a half-written file.
pub(crate) fn write_atomically(
    path: &Path,
    buf: &[u8],
) -> std::io::Result<()> {
    create_parent_dir_if_not_exist(path)?;

    let temp_path = temp_path_for(path);
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(buf)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)
}

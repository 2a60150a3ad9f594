//! File-backed KeyValueStorage
//!
//! Each key is one file inside a directory, which gives a native process the
//! same "survives a restart" behavior browser local storage has.

use crate::core::error::StorageError;
use crate::storage::KeyValueStorage;
use std::fs;
use std::path::{Path, PathBuf};
use url::form_urlencoded;

/// Stores each key as a file under `root`
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys may contain separators, keep them inside the root
        let name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.root.join(format!("{}.json", name))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_error = |e: std::io::Error| StorageError::Io {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(io_error)?;
        fs::write(self.path_for(key), value).map_err(io_error)
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.path_for(key))
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::debug!(key = %key, error = %e, "Failed to remove storage file");
        }
    }
}

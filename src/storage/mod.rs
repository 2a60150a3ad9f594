//! Key/value storage backends for persisted grid state

pub mod file;
pub mod in_memory;

pub use file::FileStorage;
pub use in_memory::MemoryStorage;

use crate::core::error::StorageError;

/// Synchronous string key/value store
///
/// Writes report failures as values; callers that treat persistence as
/// best-effort are expected to discard them.
pub trait KeyValueStorage: Send + Sync {
    /// Get the stored value, `None` if absent or unreadable
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing an absent key is not an error
    fn remove_item(&self, key: &str);
}

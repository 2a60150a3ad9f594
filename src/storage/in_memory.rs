//! In-memory implementation of KeyValueStorage for testing and development

use crate::core::error::StorageError;
use crate::storage::KeyValueStorage;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory key/value storage
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// An optional byte quota makes writes fail the way a full browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create a new unbounded storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that rejects writes beyond `quota` bytes of keys and values
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Arc::default(),
            quota: Some(quota),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a"), None);

        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").as_deref(), Some("1"));

        storage.remove_item("a");
        assert_eq!(storage.get_item("a"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_items() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(other.get_item("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(8);
        storage.set_item("k", "1234").unwrap();

        let err = storage.set_item("k2", "123456").unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_QUOTA_EXCEEDED");
        assert_eq!(storage.get_item("k2"), None);

        // overwriting an existing key only counts the new value
        storage.set_item("k", "1234567").unwrap();
    }
}

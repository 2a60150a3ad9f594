//! StateProvider backed by one JSON document in a key/value store

use crate::core::query::{Filters, SortOrder, SortState};
use crate::state::StateProvider;
use crate::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default storage key
pub const DEFAULT_STORAGE_KEY: &str = "grid-state";

/// Stored document: `{ filters?, sort?, page?, cursor? }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Persists state under a single storage key
///
/// Each mutation reads, modifies and rewrites the whole document. Corrupted
/// content reads as empty state, and failed writes are logged and dropped.
#[derive(Clone)]
pub struct LocalStorageStateProvider {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl LocalStorageStateProvider {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Provider using the `grid-state` key
    pub fn with_default_key(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Read the stored document, empty if missing or unreadable
    pub fn load_state(&self) -> PersistedState {
        let Some(raw) = self.storage.get_item(&self.key) else {
            return PersistedState::default();
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Ignoring corrupted grid state in storage"
                );
                PersistedState::default()
            }
        }
    }

    fn save_state(&self, state: &PersistedState) {
        let encoded = match serde_json::to_string(state) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to encode grid state");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, &encoded) {
            tracing::warn!(
                key = %self.key,
                code = e.error_code(),
                error = %e,
                "Grid state not persisted"
            );
        }
    }

    fn update(&self, f: impl FnOnce(&mut PersistedState)) {
        let mut state = self.load_state();
        f(&mut state);
        self.save_state(&state);
    }
}

impl fmt::Debug for LocalStorageStateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorageStateProvider")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl StateProvider for LocalStorageStateProvider {
    fn filter(&self, key: &str) -> Option<String> {
        self.load_state()
            .filters?
            .swap_remove(key)
            .filter(|value| !value.is_empty())
    }

    fn set_filter(&self, key: &str, value: &str) {
        if value.is_empty() {
            self.clear_filter(key);
            return;
        }

        self.update(|state| {
            state
                .filters
                .get_or_insert_with(Filters::new)
                .insert(key.to_string(), value.to_string());
        });
    }

    fn clear_filter(&self, key: &str) {
        self.update(|state| {
            if let Some(filters) = state.filters.as_mut() {
                filters.shift_remove(key);
            }
        });
    }

    fn filters(&self) -> Filters {
        self.load_state()
            .filters
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    fn sort(&self) -> Option<SortState> {
        self.load_state().sort.filter(|sort| !sort.field.is_empty())
    }

    fn set_sort(&self, field: &str, order: SortOrder) {
        self.update(|state| {
            state.sort = (!field.is_empty()).then(|| SortState::new(field, order));
        });
    }

    fn clear_sort(&self) {
        self.update(|state| state.sort = None);
    }

    fn page(&self) -> Option<usize> {
        self.load_state().page
    }

    fn set_page(&self, page: usize) {
        self.update(|state| state.page = Some(page));
    }

    fn clear_page(&self) {
        self.update(|state| state.page = None);
    }

    fn cursor(&self) -> Option<String> {
        self.load_state().cursor.filter(|cursor| !cursor.is_empty())
    }

    fn set_cursor(&self, cursor: &str) {
        self.update(|state| {
            state.cursor = (!cursor.is_empty()).then(|| cursor.to_string());
        });
    }

    fn clear_cursor(&self) {
        self.update(|state| state.cursor = None);
    }

    fn clear(&self) {
        self.storage.remove_item(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_document_shape() {
        let storage = Arc::new(MemoryStorage::new());
        let state = LocalStorageStateProvider::with_default_key(storage.clone());
        state.set_filter("name", "al");
        state.set_sort("age", SortOrder::Desc);
        state.set_page(2);

        let raw = storage.get_item("grid-state").unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filters": {"name": "al"},
                "sort": {"field": "age", "order": "desc"},
                "page": 2
            })
        );
    }

    #[test]
    fn test_corrupted_content_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("grid-state", "invalid json").unwrap();
        let state = LocalStorageStateProvider::with_default_key(storage.clone());

        assert_eq!(state.filter("x"), None);
        assert_eq!(state.sort(), None);

        // the next write replaces the corrupted document
        state.set_page(1);
        assert_eq!(state.page(), Some(1));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let storage = Arc::new(MemoryStorage::with_quota(4));
        let state = LocalStorageStateProvider::with_default_key(storage);
        state.set_filter("name", "a value far beyond the quota");
        assert_eq!(state.filter("name"), None);
    }

    #[test]
    fn test_clear_removes_key() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("unrelated", "keep").unwrap();
        let state = LocalStorageStateProvider::new(storage.clone(), "orders");
        state.set_cursor("abc");
        state.clear();
        assert_eq!(storage.get_item("orders"), None);
        assert_eq!(storage.get_item("unrelated").as_deref(), Some("keep"));
    }
}

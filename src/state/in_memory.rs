//! In-memory implementation of StateProvider

use crate::core::query::{Filters, SortOrder, SortState};
use crate::state::StateProvider;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct GridState {
    filters: Filters,
    sort: Option<SortState>,
    page: Option<usize>,
    cursor: Option<String>,
}

/// Process-local state, lost when the last handle is dropped
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateProvider {
    state: Arc<RwLock<GridState>>,
}

impl InMemoryStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, GridState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GridState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateProvider for InMemoryStateProvider {
    fn filter(&self, key: &str) -> Option<String> {
        self.read().filters.get(key).cloned()
    }

    fn set_filter(&self, key: &str, value: &str) {
        if value.is_empty() {
            self.clear_filter(key);
        } else {
            self.write()
                .filters
                .insert(key.to_string(), value.to_string());
        }
    }

    fn clear_filter(&self, key: &str) {
        self.write().filters.shift_remove(key);
    }

    fn filters(&self) -> Filters {
        self.read().filters.clone()
    }

    fn sort(&self) -> Option<SortState> {
        self.read().sort.clone()
    }

    fn set_sort(&self, field: &str, order: SortOrder) {
        self.write().sort = (!field.is_empty()).then(|| SortState::new(field, order));
    }

    fn clear_sort(&self) {
        self.write().sort = None;
    }

    fn page(&self) -> Option<usize> {
        self.read().page
    }

    fn set_page(&self, page: usize) {
        self.write().page = Some(page);
    }

    fn clear_page(&self) {
        self.write().page = None;
    }

    fn cursor(&self) -> Option<String> {
        self.read().cursor.clone()
    }

    fn set_cursor(&self, cursor: &str) {
        self.write().cursor = (!cursor.is_empty()).then(|| cursor.to_string());
    }

    fn clear_cursor(&self) {
        self.write().cursor = None;
    }

    fn clear(&self) {
        *self.write() = GridState::default();
    }
}

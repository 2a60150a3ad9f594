//! The data provider contract shared by every backend

use crate::core::error::Result;
use crate::core::pagination::{Pagination, PaginationData};
use crate::core::query::{LoadOptions, LoadResult, SortOrder, SortState};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of rows for a grid
///
/// Every implementation runs the same state machine:
///
/// - `load()` reads filters, sort and page/cursor from the state provider,
///   produces a page and updates the pagination snapshot
/// - `load_more()` advances (next cursor, or next page in page mode) and is a
///   no-op once `has_more()` is false
/// - `refresh()` drops displayed rows and persisted page/cursor, keeps
///   filters and sort, then loads again
/// - `set_page()` loads a specific page
///
/// `is_loading()` is true while any of these is suspended on its data source
/// and is reset on every exit path.
#[async_trait]
pub trait DataProvider<T: Send>: Send + Sync {
    /// Load rows using persisted state merged with `options`
    async fn load(&self, options: LoadOptions) -> Result<LoadResult<T>>;

    /// Load the next cursor page or the next numbered page
    async fn load_more(&self) -> Result<LoadResult<T>>;

    /// Reset pagination and load from the beginning
    async fn refresh(&self) -> Result<LoadResult<T>>;

    /// Load a specific 1-based page
    async fn set_page(&self, page: usize) -> Result<LoadResult<T>>;

    /// Whether a load is in flight
    fn is_loading(&self) -> bool;

    /// Whether `load_more()` would fetch anything
    fn has_more(&self) -> bool;

    /// Rows currently displayed
    fn current_items(&self) -> Vec<T>;

    /// Raw metadata of the last page
    #[deprecated(note = "use `pagination()` instead")]
    fn current_pagination(&self) -> Option<PaginationData>;

    /// Snapshot view of the last page's metadata
    fn pagination(&self) -> Box<dyn Pagination>;

    /// Persist a new sort (replaces the previous one)
    fn set_sort(&self, field: &str, order: SortOrder);

    /// Persisted sort, if any
    fn sort(&self) -> Option<SortState>;
}

/// Counts in-flight loads
///
/// Overlapping loads each hold a guard, so the flag only drops back to false
/// once the last one has finished.
#[derive(Debug, Default)]
pub struct LoadingTracker {
    in_flight: AtomicUsize,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a load as started until the returned guard is dropped
    pub fn start(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { tracker: self }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Resets the loading flag on drop (success, error or cancellation)
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    tracker: &'a LoadingTracker,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_resets_flag() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_loading());
        {
            let _guard = tracker.start();
            assert!(tracker.is_loading());
        }
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_overlapping_guards() {
        let tracker = LoadingTracker::new();
        let first = tracker.start();
        let second = tracker.start();
        drop(first);
        assert!(tracker.is_loading());
        drop(second);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_guard_resets_on_early_return() {
        fn fails(tracker: &LoadingTracker) -> std::result::Result<(), &'static str> {
            let _guard = tracker.start();
            Err("boom")
        }

        let tracker = LoadingTracker::new();
        assert!(fails(&tracker).is_err());
        assert!(!tracker.is_loading());
    }
}

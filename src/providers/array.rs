//! Data provider over an in-memory collection

use crate::config::ArrayProviderConfig;
use crate::core::error::Result;
use crate::core::field::{Record, compare_fields};
use crate::core::pagination::{
    ArrayPagination, CursorPaginationData, PagePaginationData, Pagination, PaginationData,
};
use crate::core::provider::{DataProvider, LoadingTracker};
use crate::core::query::{Filters, LoadOptions, LoadResult, PaginationMode, SortOrder, SortState};
use crate::state::{InMemoryStateProvider, StateProvider};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Debug)]
struct DisplayState<T> {
    items: Vec<T>,
    pagination: ArrayPagination,
}

impl<T> Default for DisplayState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: ArrayPagination::default(),
        }
    }
}

/// Filters, sorts and paginates rows held in memory
///
/// In cursor mode the cursor is the decimal start index into the filtered and
/// sorted rows, so reordering the source changes what a cursor points at.
///
/// # Example
/// ```rust,ignore
/// let provider = ArrayDataProvider::new(rows, ArrayProviderConfig::cursor(2));
/// let first = provider.load(LoadOptions::default()).await?;   // rows 0..2, cursor "2"
/// let more = provider.load_more().await?;                      // rows 0..4, cursor "4"
/// ```
pub struct ArrayDataProvider<T> {
    rows: RwLock<Vec<T>>,
    config: ArrayProviderConfig,
    state: Arc<dyn StateProvider>,
    display: Mutex<DisplayState<T>>,
    loading: LoadingTracker,
}

impl<T> ArrayDataProvider<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    /// Provider with its own in-memory state
    pub fn new(rows: Vec<T>, config: ArrayProviderConfig) -> Self {
        Self::with_state_provider(rows, config, Arc::new(InMemoryStateProvider::new()))
    }

    /// Provider persisting filters, sort and position through `state`
    pub fn with_state_provider(
        rows: Vec<T>,
        config: ArrayProviderConfig,
        state: Arc<dyn StateProvider>,
    ) -> Self {
        Self {
            rows: RwLock::new(rows),
            config,
            state,
            display: Mutex::new(DisplayState::default()),
            loading: LoadingTracker::new(),
        }
    }

    pub fn config(&self) -> &ArrayProviderConfig {
        &self.config
    }

    pub fn state_provider(&self) -> &Arc<dyn StateProvider> {
        &self.state
    }

    /// Replace the source rows; takes effect on the next load
    pub fn set_rows(&self, rows: Vec<T>) {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = rows;
    }

    fn display(&self) -> MutexGuard<'_, DisplayState<T>> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn page_size(&self) -> usize {
        self.config.page_size.max(1)
    }

    /// Rows matching every filter, in sort order
    fn query(&self, filters: &Filters, sort: Option<&SortState>) -> Vec<T> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<T> = rows
            .iter()
            .filter(|row| {
                filters.iter().all(|(field, needle)| {
                    row.field_value(field)
                        .is_some_and(|value| value.matches_filter(needle))
                })
            })
            .cloned()
            .collect();

        if let Some(sort) = sort {
            // sort_by is stable, equal keys keep source order
            matched.sort_by(|a, b| {
                let (a, b) = (a.field_value(&sort.field), b.field_value(&sort.field));
                let ordering = compare_fields(a.as_ref(), b.as_ref());
                match sort.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        matched
    }

    fn snapshot(&self) -> LoadResult<T> {
        let display = self.display();
        let pagination = if self.config.pagination_enabled {
            display.pagination.data().cloned()
        } else {
            None
        };
        LoadResult::new(display.items.clone(), pagination)
    }

    fn load_cursor(&self, rows: Vec<T>, requested: Option<String>) -> LoadResult<T> {
        let total = rows.len();
        let mut display = self.display();

        let cursor = requested.or_else(|| {
            display
                .items
                .is_empty()
                .then(|| self.state.cursor())
                .flatten()
        });
        let start = cursor
            .as_deref()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0)
            .min(total);
        let end = start.saturating_add(self.page_size()).min(total);
        let slice = rows[start..end].to_vec();

        match &cursor {
            Some(_) if !display.items.is_empty() => display.items.extend(slice),
            _ => display.items = slice,
        }
        match &cursor {
            Some(token) => self.state.set_cursor(token),
            // a first page must not leave an older position behind
            None => self.state.clear_cursor(),
        }

        let has_more = end < total;
        let next_cursor = if has_more { end.to_string() } else { String::new() };
        let data = PaginationData::from(CursorPaginationData::new(next_cursor, has_more));
        display.pagination.update(Some(data.clone()));

        let shown = display.items.len();
        tracing::debug!(
            start = start,
            end = end,
            total = total,
            displayed = shown,
            "Loaded cursor page from array"
        );

        LoadResult::new(display.items.clone(), Some(data))
    }

    fn load_page(&self, rows: Vec<T>, requested: Option<usize>) -> LoadResult<T> {
        let total = rows.len();
        let page_size = self.page_size();
        let page = requested.or_else(|| self.state.page()).unwrap_or(1).max(1);
        self.state.set_page(page);

        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);

        let data = PaginationData::from(PagePaginationData::new(page, page_size, total));
        let mut display = self.display();
        display.items = rows[start..end].to_vec();
        display.pagination.update(Some(data.clone()));

        tracing::debug!(page = page, total = total, rows = end - start, "Loaded page from array");

        LoadResult::new(display.items.clone(), Some(data))
    }

    fn load_all(&self, rows: Vec<T>) -> LoadResult<T> {
        let total = rows.len();
        let mut display = self.display();
        display.items = rows;
        // still tracked so total_count() stays meaningful
        display
            .pagination
            .update(Some(PagePaginationData::new(1, total, total).into()));

        LoadResult::new(display.items.clone(), None)
    }
}

#[async_trait]
impl<T> DataProvider<T> for ArrayDataProvider<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    async fn load(&self, options: LoadOptions) -> Result<LoadResult<T>> {
        let _loading = self.loading.start();

        let delay = self.config.load_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(params) = &options.search_params {
            for (key, value) in params {
                self.state.set_filter(key, value);
            }
        }

        let sort = match &options.sort_field {
            Some(field) => {
                let order = options.sort_order.unwrap_or_default();
                self.state.set_sort(field, order);
                Some(SortState::new(field.clone(), order))
            }
            None => self.state.sort(),
        };
        if let Some(sort) = &sort {
            tracing::debug!(field = %sort.field, order = %sort.order, "Sorting array rows");
        }

        let filters = self.state.filters();
        let rows = self.query(&filters, sort.as_ref());

        if !self.config.pagination_enabled {
            return Ok(self.load_all(rows));
        }

        Ok(match self.config.pagination_mode {
            PaginationMode::Cursor => self.load_cursor(rows, options.cursor),
            PaginationMode::Page => self.load_page(rows, options.page),
        })
    }

    async fn load_more(&self) -> Result<LoadResult<T>> {
        if !self.has_more() {
            return Ok(self.snapshot());
        }

        match self.config.pagination_mode {
            PaginationMode::Cursor => {
                let start = self.display().items.len();
                self.load(LoadOptions::default().with_cursor(start.to_string()))
                    .await
            }
            PaginationMode::Page => {
                let current = self.display().pagination.current_page().unwrap_or(1);
                self.set_page(current + 1).await
            }
        }
    }

    async fn refresh(&self) -> Result<LoadResult<T>> {
        {
            let mut display = self.display();
            display.items.clear();
            display.pagination.update(None);
        }
        self.state.clear_page();
        self.state.clear_cursor();

        self.load(LoadOptions::default()).await
    }

    async fn set_page(&self, page: usize) -> Result<LoadResult<T>> {
        if self.config.pagination_mode == PaginationMode::Cursor {
            tracing::warn!(page = page, "set_page called on a cursor-mode array provider");
        }
        self.load(LoadOptions::default().with_page(page)).await
    }

    fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    fn has_more(&self) -> bool {
        self.display()
            .pagination
            .data()
            .is_some_and(PaginationData::has_next)
    }

    fn current_items(&self) -> Vec<T> {
        self.display().items.clone()
    }

    fn current_pagination(&self) -> Option<PaginationData> {
        self.display().pagination.data().cloned()
    }

    fn pagination(&self) -> Box<dyn Pagination> {
        Box::new(self.display().pagination.clone())
    }

    fn set_sort(&self, field: &str, order: SortOrder) {
        self.state.set_sort(field, order);
    }

    fn sort(&self) -> Option<SortState> {
        self.state.sort()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Alice", "age": 25}),
            json!({"name": "Bob", "age": 35}),
            json!({"name": "Charlie", "age": 30}),
            json!({"name": "David", "age": 40}),
            json!({"name": "Eve", "age": 45}),
        ]
    }

    fn config(mode: PaginationMode, page_size: usize) -> ArrayProviderConfig {
        ArrayProviderConfig {
            page_size,
            pagination_mode: mode,
            load_delay_ms: 0,
            ..ArrayProviderConfig::default()
        }
    }

    fn names(items: &[Value]) -> Vec<&str> {
        items.iter().filter_map(|i| i["name"].as_str()).collect()
    }

    #[tokio::test]
    async fn test_cursor_is_start_index() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 2));
        let result = provider
            .load(LoadOptions::default().with_cursor("3"))
            .await
            .unwrap();
        assert_eq!(names(&result.items), vec!["David", "Eve"]);
        assert_eq!(
            result.pagination,
            Some(CursorPaginationData::new("", false).into())
        );
    }

    #[tokio::test]
    async fn test_invalid_cursor_starts_at_zero() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 2));
        let result = provider
            .load(LoadOptions::default().with_cursor("abc"))
            .await
            .unwrap();
        assert_eq!(names(&result.items), vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_filter_on_missing_or_boolean_field_matches_nothing() {
        let rows = vec![json!({"name": "A", "active": true})];
        let provider = ArrayDataProvider::new(rows, config(PaginationMode::Cursor, 10));

        let result = provider
            .load(LoadOptions::default().with_search_param("active", "true"))
            .await
            .unwrap();
        assert!(result.items.is_empty());

        provider.state_provider().clear();
        let result = provider
            .load(LoadOptions::default().with_search_param("missing", "x"))
            .await
            .unwrap();
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_filter_matches_substring() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 10));
        let result = provider
            .load(LoadOptions::default().with_search_param("age", "5"))
            .await
            .unwrap();
        assert_eq!(names(&result.items), vec!["Alice", "Bob", "Eve"]);
    }

    #[tokio::test]
    async fn test_descending_sort_is_stable() {
        let rows = vec![
            json!({"id": 1, "group": "b"}),
            json!({"id": 2, "group": "a"}),
            json!({"id": 3, "group": "b"}),
        ];
        let provider = ArrayDataProvider::new(rows, config(PaginationMode::Cursor, 10));
        provider.set_sort("group", SortOrder::Desc);

        let result = provider.load(LoadOptions::default()).await.unwrap();
        let ids: Vec<_> = result.items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_page_zero_is_clamped() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Page, 2));
        let result = provider.set_page(0).await.unwrap();
        assert_eq!(names(&result.items), vec!["Alice", "Bob"]);
        assert_eq!(provider.state_provider().page(), Some(1));
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Page, 2));
        let result = provider.set_page(9).await.unwrap();
        assert!(result.items.is_empty());
        assert!(!provider.has_more());
    }

    #[tokio::test]
    async fn test_explicit_sort_is_applied_and_persisted() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 10));
        let result = provider
            .load(LoadOptions::new().with_sort("age", SortOrder::Desc))
            .await
            .unwrap();
        assert_eq!(
            names(&result.items),
            vec!["Eve", "David", "Bob", "Charlie", "Alice"]
        );
        assert_eq!(provider.sort(), Some(SortState::desc("age")));

        // later loads keep the persisted sort
        let result = provider.refresh().await.unwrap();
        assert_eq!(names(&result.items)[0], "Eve");
    }

    #[tokio::test]
    async fn test_first_page_clears_persisted_cursor() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 2));
        provider.load(LoadOptions::default()).await.unwrap();
        provider.load_more().await.unwrap();
        assert_eq!(provider.state_provider().cursor().as_deref(), Some("2"));

        provider
            .load(LoadOptions::default().with_search_param("name", "e"))
            .await
            .unwrap();
        assert_eq!(provider.state_provider().cursor(), None);
    }

    #[tokio::test]
    async fn test_set_rows_applies_on_next_load() {
        let provider = ArrayDataProvider::new(people(), config(PaginationMode::Cursor, 10));
        provider.load(LoadOptions::default()).await.unwrap();
        provider.set_rows(vec![json!({"name": "Zed"})]);
        assert_eq!(provider.current_items().len(), 5);

        let result = provider.refresh().await.unwrap();
        assert_eq!(names(&result.items), vec!["Zed"]);
    }
}

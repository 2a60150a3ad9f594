//! Data provider over a remote endpoint

use crate::config::HttpProviderConfig;
use crate::core::error::{GridError, Result};
use crate::core::pagination::{ElasticPagination, HttpPagination, Pagination, PaginationData};
use crate::core::provider::{DataProvider, LoadingTracker};
use crate::core::query::{Filters, LoadOptions, LoadResult, PaginationMode, SortOrder, SortState};
use crate::core::request::PaginationRequest;
use crate::http::{DefaultResponseAdapter, HttpClient, ResponseAdapter};
use crate::state::{
    DEFAULT_PREFIX, InMemoryStateProvider, QueryParamsStateProvider, Router, StateProvider,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::form_urlencoded;

/// Query parameter carrying the encoded sort
pub const SORT_PARAM: &str = "sort";

#[derive(Debug)]
struct DisplayState<T> {
    items: Vec<T>,
    pagination: HttpPagination,
    total_hits: Option<usize>,
}

impl<T> Default for DisplayState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: HttpPagination::default(),
            total_hits: None,
        }
    }
}

/// Fetches rows from an HTTP endpoint
///
/// Requests are `GET <url>?<filters>&sort=<field|-field>&<pagination>`. The
/// response is translated by a [`ResponseAdapter`]; a failed request or a
/// response the adapter rejects fails the load and leaves displayed rows as
/// they were.
///
/// # Example
/// ```rust,ignore
/// let config = HttpProviderConfig::new("https://api.example.com/users")
///     .with_mode(PaginationMode::Page);
/// let provider: HttpDataProvider<User> =
///     HttpDataProvider::new(config, Arc::new(ReqwestHttpClient::new()));
/// let page = provider.load(LoadOptions::default()).await?;
/// // GET https://api.example.com/users?page=1&per-page=10
/// ```
pub struct HttpDataProvider<T = Value> {
    config: HttpProviderConfig,
    client: Arc<dyn HttpClient>,
    adapter: Arc<dyn ResponseAdapter<T>>,
    state: Arc<dyn StateProvider>,
    display: Mutex<DisplayState<T>>,
    loading: LoadingTracker,
}

impl<T> HttpDataProvider<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Provider with the default adapter and its own in-memory state
    pub fn new(config: HttpProviderConfig, client: Arc<dyn HttpClient>) -> Self {
        Self::with_parts(
            config,
            client,
            Arc::new(DefaultResponseAdapter),
            Arc::new(InMemoryStateProvider::new()),
        )
    }

    /// Provider keeping its state in the query string under the `search` prefix
    pub fn with_router(
        config: HttpProviderConfig,
        client: Arc<dyn HttpClient>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self::new(config, client).with_state_provider(Arc::new(QueryParamsStateProvider::new(
            router,
            DEFAULT_PREFIX,
        )))
    }

    /// Provider using the reqwest-backed client
    #[cfg(feature = "reqwest")]
    pub fn with_default_client(config: HttpProviderConfig) -> Self {
        Self::new(config, Arc::new(crate::http::ReqwestHttpClient::new()))
    }
}

impl<T> HttpDataProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Provider from explicit collaborators
    pub fn with_parts(
        config: HttpProviderConfig,
        client: Arc<dyn HttpClient>,
        adapter: Arc<dyn ResponseAdapter<T>>,
        state: Arc<dyn StateProvider>,
    ) -> Self {
        Self {
            config,
            client,
            adapter,
            state,
            display: Mutex::new(DisplayState::default()),
            loading: LoadingTracker::new(),
        }
    }

    pub fn with_state_provider(mut self, state: Arc<dyn StateProvider>) -> Self {
        self.state = state;
        self
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ResponseAdapter<T>>) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn config(&self) -> &HttpProviderConfig {
        &self.config
    }

    pub fn state_provider(&self) -> &Arc<dyn StateProvider> {
        &self.state
    }

    fn display(&self) -> MutexGuard<'_, DisplayState<T>> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request URL for the given filters, sort and pagination
    pub fn build_url(
        &self,
        filters: &Filters,
        sort: Option<&SortState>,
        request: &PaginationRequest,
    ) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        for (key, value) in filters {
            if !value.is_empty() {
                query.append_pair(key, value);
            }
        }
        if let Some(sort) = sort {
            query.append_pair(SORT_PARAM, &sort.to_param());
        }
        for (key, value) in request.query_pairs() {
            query.append_pair(&key, &value);
        }

        let query = query.finish();
        if query.is_empty() {
            return self.config.url.clone();
        }

        let separator = if self.config.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.config.url, separator, query)
    }

    fn snapshot(&self) -> LoadResult<T> {
        let display = self.display();
        LoadResult::new(display.items.clone(), display.pagination.data().cloned())
    }
}

impl<T> fmt::Debug for HttpDataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDataProvider")
            .field("config", &self.config)
            .field("loading", &self.loading.is_loading())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> DataProvider<T> for HttpDataProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self, options: LoadOptions) -> Result<LoadResult<T>> {
        let _loading = self.loading.start();
        let mode = self.config.pagination_mode;

        let mut filters = self.state.filters();
        if let Some(params) = &options.search_params {
            for (key, value) in params {
                self.state.set_filter(key, value);
                filters.insert(key.clone(), value.clone());
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

        let (cursor, page) = match mode {
            PaginationMode::Cursor => {
                let restore = self.display().items.is_empty();
                let cursor = options
                    .cursor
                    .clone()
                    .or_else(|| restore.then(|| self.state.cursor()).flatten())
                    .filter(|c| !c.is_empty());
                (cursor, None)
            }
            PaginationMode::Page => {
                let page = options.page.or_else(|| self.state.page()).unwrap_or(1).max(1);
                (None, Some(page))
            }
        };

        let next = match (&cursor, page) {
            (Some(cursor), _) => cursor.clone(),
            (None, Some(page)) => page.to_string(),
            (None, None) => String::new(),
        };
        let request = self.config.pagination_request(next);
        self.adapter.prepare_request(&request);

        let url = self.build_url(&filters, sort.as_ref(), &request);
        tracing::debug!(url = %url, mode = ?mode, "Loading page over HTTP");

        let response = self.client.get(&url).await.inspect_err(|e| {
            tracing::debug!(url = %url, error = %e, "HTTP load failed");
        })?;

        if !self.adapter.is_success(&response) {
            let err = GridError::application(self.adapter.error_message(&response));
            tracing::debug!(url = %url, error = %err, "Response rejected by adapter");
            return Err(err);
        }

        let items = self.adapter.extract_items(&response)?;
        let pagination = self.adapter.extract_pagination(&response);
        let total_hits = self.adapter.total_hits(&response);

        match (mode, &cursor) {
            (PaginationMode::Cursor, Some(cursor)) => self.state.set_cursor(cursor),
            // a first page must not leave an older position behind
            (PaginationMode::Cursor, None) => self.state.clear_cursor(),
            (PaginationMode::Page, _) => {}
        }
        if let Some(page) = page {
            self.state.set_page(page);
        }

        let mut display = self.display();
        if cursor.is_some() {
            display.items.extend(items);
        } else {
            display.items = items;
        }
        display.pagination.update(pagination.clone());
        display.total_hits = total_hits;

        let shown = display.items.len();
        let has_more = display.pagination.has_more();
        tracing::debug!(displayed = shown, has_more = has_more, "HTTP load complete");

        Ok(LoadResult::new(display.items.clone(), pagination))
    }

    async fn load_more(&self) -> Result<LoadResult<T>> {
        if !self.has_more() {
            return Ok(self.snapshot());
        }

        match self.config.pagination_mode {
            PaginationMode::Cursor => {
                let Some(token) = self.display().pagination.next_token() else {
                    return Ok(self.snapshot());
                };
                self.load(LoadOptions::default().with_cursor(token)).await
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
            display.total_hits = None;
        }
        self.state.clear_page();
        self.state.clear_cursor();

        self.load(LoadOptions::default()).await
    }

    async fn set_page(&self, page: usize) -> Result<LoadResult<T>> {
        if self.config.pagination_mode == PaginationMode::Cursor {
            tracing::warn!(
                page = page,
                url = %self.config.url,
                "set_page called on a cursor-mode HTTP provider"
            );
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
        let display = self.display();
        match display.total_hits {
            Some(total) => Box::new(ElasticPagination::new(
                display.pagination.data().cloned(),
                Some(total),
            )),
            None => Box::new(display.pagination.clone()),
        }
    }

    fn set_sort(&self, field: &str, order: SortOrder) {
        self.state.set_sort(field, order);
    }

    fn sort(&self) -> Option<SortState> {
        self.state.sort()
    }
}

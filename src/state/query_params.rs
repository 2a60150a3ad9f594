//! StateProvider backed by the URL query string

use crate::state::router::{QueryValue, RouteUpdate, Router};
use crate::state::{DEFAULT_PREFIX, ParamBackend, ParamChange, impl_param_state_provider};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Stores state as `<prefix>-<key>` query parameters
///
/// Parameters outside the prefix are never touched, so several grids with
/// different prefixes can share one URL.
///
/// # Example
/// ```rust,ignore
/// let router = Arc::new(MemoryRouter::new());
/// let state = QueryParamsStateProvider::new(router.clone(), "users");
/// state.set_filter("name", "al");
/// state.set_sort("age", SortOrder::Desc);
/// // -> ?users-name=al&users-sort=-age
/// ```
#[derive(Clone)]
pub struct QueryParamsStateProvider {
    router: Arc<dyn Router>,
    prefix: String,
}

impl QueryParamsStateProvider {
    pub fn new(router: Arc<dyn Router>, prefix: impl Into<String>) -> Self {
        Self {
            router,
            prefix: prefix.into(),
        }
    }

    /// Provider with the default `search` prefix
    pub fn with_default_prefix(router: Arc<dyn Router>) -> Self {
        Self::new(router, DEFAULT_PREFIX)
    }
}

impl fmt::Debug for QueryParamsStateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParamsStateProvider")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ParamBackend for QueryParamsStateProvider {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn params(&self) -> IndexMap<String, String> {
        self.router
            .current_route()
            .query
            .into_iter()
            .filter_map(|(key, value)| value.first().map(|v| (key, v.to_string())))
            .collect()
    }

    fn apply(&self, changes: Vec<ParamChange>) {
        let route = self.router.current_route();
        let mut query = route.query;

        for (key, value) in changes {
            match value {
                Some(value) => {
                    query.insert(key, QueryValue::Single(value));
                }
                None => {
                    query.shift_remove(&key);
                }
            }
        }

        self.router.replace(RouteUpdate {
            query: Some(query),
            hash: Some(route.hash),
        });
    }
}

impl_param_state_provider!(QueryParamsStateProvider);

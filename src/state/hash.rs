//! StateProvider backed by the URL fragment

use crate::state::router::{RouteUpdate, Router};
use crate::state::{DEFAULT_PREFIX, ParamBackend, ParamChange, impl_param_state_provider};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use url::form_urlencoded;

/// Stores state in the fragment as `#<prefix>-<key>=<value>&...`
///
/// Same key scheme as [`QueryParamsStateProvider`](crate::state::QueryParamsStateProvider).
/// Reads accept `""`, `"#"` and fragments without the leading `#`; writes
/// produce an empty fragment (not `"#"`) once no parameters remain.
#[derive(Clone)]
pub struct HashStateProvider {
    router: Arc<dyn Router>,
    prefix: String,
}

impl HashStateProvider {
    pub fn new(router: Arc<dyn Router>, prefix: impl Into<String>) -> Self {
        Self {
            router,
            prefix: prefix.into(),
        }
    }

    pub fn with_default_prefix(router: Arc<dyn Router>) -> Self {
        Self::new(router, DEFAULT_PREFIX)
    }
}

impl fmt::Debug for HashStateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashStateProvider")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Decode a fragment; the first occurrence of a key wins
pub fn parse_hash(hash: &str) -> IndexMap<String, String> {
    let body = hash.strip_prefix('#').unwrap_or(hash);
    let mut params = IndexMap::new();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Encode parameters as a fragment, `""` when there are none
pub fn format_hash(params: &IndexMap<String, String>) -> String {
    if params.is_empty() {
        return String::new();
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    format!("#{}", encoded)
}

impl ParamBackend for HashStateProvider {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn params(&self) -> IndexMap<String, String> {
        parse_hash(&self.router.current_route().hash)
    }

    fn apply(&self, changes: Vec<ParamChange>) {
        let route = self.router.current_route();
        let mut params = parse_hash(&route.hash);

        for (key, value) in changes {
            match value {
                Some(value) => {
                    params.insert(key, value);
                }
                None => {
                    params.shift_remove(&key);
                }
            }
        }

        self.router.replace(RouteUpdate {
            query: Some(route.query),
            hash: Some(format_hash(&params)),
        });
    }
}

impl_param_state_provider!(HashStateProvider);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::{SortOrder, SortState};
    use crate::state::StateProvider;
    use crate::state::router::{MemoryRouter, Route};

    fn router_with_hash(hash: &str) -> Arc<MemoryRouter> {
        Arc::new(MemoryRouter::with_route(Route {
            hash: hash.to_string(),
            ..Route::default()
        }))
    }

    #[test]
    fn test_tolerates_degenerate_hashes() {
        for hash in ["", "#"] {
            let state = HashStateProvider::with_default_prefix(router_with_hash(hash));
            assert_eq!(state.filter("name"), None);
            assert!(state.filters().is_empty());
        }

        let state = HashStateProvider::with_default_prefix(router_with_hash("search-name=al"));
        assert_eq!(state.filter("name").as_deref(), Some("al"));
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let router = router_with_hash("");
        let state = HashStateProvider::new(router.clone(), "g");
        state.set_filter("q", "a&b=c");
        assert_eq!(router.current_route().hash, "#g-q=a%26b%3Dc");
        assert_eq!(state.filter("q").as_deref(), Some("a&b=c"));
    }

    #[test]
    fn test_empty_hash_has_no_marker() {
        let router = router_with_hash("");
        let state = HashStateProvider::new(router.clone(), "g");
        state.set_sort("age", SortOrder::Desc);
        assert_eq!(router.current_route().hash, "#g-sort=-age");
        assert_eq!(state.sort(), Some(SortState::desc("age")));

        state.clear();
        assert_eq!(router.current_route().hash, "");
    }

    #[test]
    fn test_query_is_left_alone() {
        let router = Arc::new(MemoryRouter::from_location("?search-name=url"));
        let state = HashStateProvider::with_default_prefix(router.clone());
        state.set_filter("name", "hash");

        let route = router.current_route();
        assert!(route.query.contains_key("search-name"));
        assert_eq!(route.hash, "#search-name=hash");
    }

    #[test]
    fn test_format_and_parse() {
        let mut params = IndexMap::new();
        params.insert("a-x".to_string(), "1 2".to_string());
        let hash = format_hash(&params);
        assert_eq!(parse_hash(&hash), params);
        assert_eq!(format_hash(&IndexMap::new()), "");
    }
}

//! Persisted filter, sort, page and cursor state
//!
//! A [`StateProvider`] is a plain key/value store with four interchangeable
//! backends:
//!
//! - [`InMemoryStateProvider`]: lives and dies with the instance
//! - [`QueryParamsStateProvider`]: URL query string, keys namespaced `<prefix>-<key>`
//! - [`HashStateProvider`]: URL fragment, same key scheme as the query string
//! - [`LocalStorageStateProvider`]: one JSON blob in a [`KeyValueStorage`](crate::storage::KeyValueStorage)
//!
//! Providers may be shared between data providers and mutated from outside,
//! so every read goes back to the backing store. Mutations never fail:
//! persistence problems are logged and dropped.

pub mod hash;
pub mod in_memory;
pub mod local_storage;
pub mod query_params;
pub mod router;

pub use hash::HashStateProvider;
pub use in_memory::InMemoryStateProvider;
pub use local_storage::{DEFAULT_STORAGE_KEY, LocalStorageStateProvider, PersistedState};
pub use query_params::QueryParamsStateProvider;
pub use router::{MemoryRouter, Query, QueryValue, Route, RouteUpdate, Router};

use crate::core::query::{Filters, SortOrder, SortState};
use indexmap::IndexMap;

/// Default namespace for URL-backed providers
pub const DEFAULT_PREFIX: &str = "search";

/// Reserved parameter names inside a namespace
pub const SORT_KEY: &str = "sort";
pub const PAGE_KEY: &str = "page";
pub const CURSOR_KEY: &str = "cursor";

/// Store for a grid's filters, sort, page and cursor
///
/// Setting a filter or cursor to `""` is the same as clearing it.
pub trait StateProvider: Send + Sync {
    /// Get a filter value
    fn filter(&self, key: &str) -> Option<String>;

    /// Set a filter; an empty value removes it
    fn set_filter(&self, key: &str, value: &str);

    fn clear_filter(&self, key: &str);

    /// All active filters
    fn filters(&self) -> Filters;

    fn sort(&self) -> Option<SortState>;

    /// Replace the active sort
    fn set_sort(&self, field: &str, order: SortOrder);

    fn clear_sort(&self);

    fn page(&self) -> Option<usize>;

    fn set_page(&self, page: usize);

    fn clear_page(&self);

    fn cursor(&self) -> Option<String>;

    /// Set the cursor; an empty token removes it
    fn set_cursor(&self, cursor: &str);

    fn clear_cursor(&self);

    /// Remove everything this provider owns, and nothing else
    fn clear(&self);
}

/// Pending edit for one raw parameter: `Some` sets, `None` removes
pub(crate) type ParamChange = (String, Option<String>);

/// Flat string parameters behind the URL-backed providers
pub(crate) trait ParamBackend {
    /// Namespace, without the trailing `-`
    fn prefix(&self) -> &str;

    /// Current parameters; list values resolve to their first element
    fn params(&self) -> IndexMap<String, String>;

    /// Apply edits in one write
    fn apply(&self, changes: Vec<ParamChange>);

    fn key(&self, name: &str) -> String {
        format!("{}-{}", self.prefix(), name)
    }

    fn owns(&self, raw_key: &str) -> bool {
        self.strip(raw_key).is_some()
    }

    fn strip<'a>(&self, raw_key: &'a str) -> Option<&'a str> {
        raw_key
            .strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
    }

    fn get_param(&self, name: &str) -> Option<String> {
        self.params()
            .swap_remove(&self.key(name))
            .filter(|value| !value.is_empty())
    }

    fn set_param(&self, name: &str, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.apply(vec![(self.key(name), value)]);
    }
}

pub(crate) fn parse_page(raw: &str) -> Option<usize> {
    match raw.parse::<usize>() {
        Ok(page) if page > 0 => Some(page),
        _ => {
            tracing::warn!(value = %raw, "Ignoring unparseable page in URL state");
            None
        }
    }
}

/// Implements [`StateProvider`] for a [`ParamBackend`]
macro_rules! impl_param_state_provider {
    ($ty:ty) => {
        impl $crate::state::StateProvider for $ty {
            fn filter(&self, key: &str) -> Option<String> {
                $crate::state::ParamBackend::get_param(self, key)
            }

            fn set_filter(&self, key: &str, value: &str) {
                $crate::state::ParamBackend::set_param(self, key, Some(value.to_string()));
            }

            fn clear_filter(&self, key: &str) {
                $crate::state::ParamBackend::set_param(self, key, None);
            }

            fn filters(&self) -> $crate::core::query::Filters {
                use $crate::state::ParamBackend;

                self.params()
                    .into_iter()
                    .filter_map(|(raw_key, value)| {
                        let name = self.strip(&raw_key)?;
                        let reserved = matches!(
                            name,
                            $crate::state::SORT_KEY
                                | $crate::state::PAGE_KEY
                                | $crate::state::CURSOR_KEY
                        );
                        (!reserved && !value.is_empty()).then(|| (name.to_string(), value))
                    })
                    .collect()
            }

            fn sort(&self) -> Option<$crate::core::query::SortState> {
                $crate::state::ParamBackend::get_param(self, $crate::state::SORT_KEY)
                    .and_then(|raw| $crate::core::query::SortState::from_param(&raw))
            }

            fn set_sort(&self, field: &str, order: $crate::core::query::SortOrder) {
                let encoded = (!field.is_empty())
                    .then(|| $crate::core::query::SortState::new(field, order).to_param());
                $crate::state::ParamBackend::set_param(self, $crate::state::SORT_KEY, encoded);
            }

            fn clear_sort(&self) {
                $crate::state::ParamBackend::set_param(self, $crate::state::SORT_KEY, None);
            }

            fn page(&self) -> Option<usize> {
                $crate::state::ParamBackend::get_param(self, $crate::state::PAGE_KEY)
                    .and_then(|raw| $crate::state::parse_page(&raw))
            }

            fn set_page(&self, page: usize) {
                $crate::state::ParamBackend::set_param(
                    self,
                    $crate::state::PAGE_KEY,
                    Some(page.to_string()),
                );
            }

            fn clear_page(&self) {
                $crate::state::ParamBackend::set_param(self, $crate::state::PAGE_KEY, None);
            }

            fn cursor(&self) -> Option<String> {
                $crate::state::ParamBackend::get_param(self, $crate::state::CURSOR_KEY)
            }

            fn set_cursor(&self, cursor: &str) {
                $crate::state::ParamBackend::set_param(
                    self,
                    $crate::state::CURSOR_KEY,
                    Some(cursor.to_string()),
                );
            }

            fn clear_cursor(&self) {
                $crate::state::ParamBackend::set_param(self, $crate::state::CURSOR_KEY, None);
            }

            fn clear(&self) {
                use $crate::state::ParamBackend;

                let changes: Vec<_> = self
                    .params()
                    .into_keys()
                    .filter(|raw_key| self.owns(raw_key))
                    .map(|raw_key| (raw_key, None))
                    .collect();
                if !changes.is_empty() {
                    self.apply(changes);
                }
            }
        }
    };
}

pub(crate) use impl_param_state_provider;

//! Address-bar abstraction used by the URL-backed state providers

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// A query parameter value; some routers decode repeated keys as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// The effective value: lists resolve to their first element
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

/// Decoded query string, in URL order
pub type Query = IndexMap<String, QueryValue>;

/// The current location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub query: Query,

    /// Raw fragment, with or without the leading `#`
    pub hash: String,
}

/// Replacement location; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteUpdate {
    pub query: Option<Query>,
    pub hash: Option<String>,
}

/// Router-like collaborator owning the address bar
pub trait Router: Send + Sync {
    /// Snapshot of the current location
    fn current_route(&self) -> Route;

    /// Replace the current location without pushing history
    fn replace(&self, update: RouteUpdate);
}

/// In-process router, useful for tests and headless hosts
#[derive(Debug, Default)]
pub struct MemoryRouter {
    route: RwLock<Route>,
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an existing location
    pub fn with_route(route: Route) -> Self {
        Self {
            route: RwLock::new(route),
        }
    }

    /// Start at a location given as `?a=1&b=2#frag`
    pub fn from_location(location: &str) -> Self {
        let (rest, hash) = match location.split_once('#') {
            Some((rest, hash)) => (rest, format!("#{}", hash)),
            None => (location, String::new()),
        };
        let query_string = rest.split_once('?').map_or(rest, |(_, q)| q);

        let mut query = Query::new();
        for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            let value = value.into_owned();
            match query.entry(key.into_owned()) {
                Entry::Occupied(mut entry) => {
                    let slot = entry.get_mut();
                    *slot = match std::mem::replace(slot, QueryValue::Multiple(Vec::new())) {
                        QueryValue::Single(first) => QueryValue::Multiple(vec![first, value]),
                        QueryValue::Multiple(mut values) => {
                            values.push(value);
                            QueryValue::Multiple(values)
                        }
                    };
                }
                Entry::Vacant(entry) => {
                    entry.insert(QueryValue::Single(value));
                }
            }
        }

        Self::with_route(Route { query, hash })
    }
}

impl Router for MemoryRouter {
    fn current_route(&self) -> Route {
        self.route
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, update: RouteUpdate) {
        let mut route = self.route.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(query) = update.query {
            route.query = query;
        }
        if let Some(hash) = update.hash {
            route.hash = hash;
        }
    }
}

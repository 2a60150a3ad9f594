//! Sort state, load options and load results

use crate::core::pagination::PaginationData;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered filter map (filter key -> filter value)
///
/// An empty value is never stored: setting a filter to `""` removes it.
pub type Filters = IndexMap<String, String>;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// The single active sort
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Encode as a URL parameter value
    ///
    /// Ascending is the bare field name, descending is `-field`.
    pub fn to_param(&self) -> String {
        match self.order {
            SortOrder::Asc => self.field.clone(),
            SortOrder::Desc => format!("-{}", self.field),
        }
    }

    /// Decode a URL parameter value produced by [`SortState::to_param`]
    pub fn from_param(param: &str) -> Option<Self> {
        match param.strip_prefix('-') {
            Some("") => None,
            Some(field) => Some(Self::desc(field)),
            None if param.is_empty() => None,
            None => Some(Self::asc(param)),
        }
    }
}

/// How a provider advances through its data
///
/// Fixed per provider at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Opaque "next" token, results accumulate
    #[default]
    Cursor,
    /// Numbered pages, results replace each other
    Page,
}

/// Per-call options for `load()`
///
/// All fields are optional; an empty value loads using persisted state only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Ad-hoc filters, persisted into the state provider
    pub search_params: Option<Filters>,

    /// Page to load (page mode)
    pub page: Option<usize>,

    /// Cursor to continue from (cursor mode)
    pub cursor: Option<String>,

    /// Explicit sort field, persisted into the state provider
    pub sort_field: Option<String>,

    /// Order for `sort_field`, ascending when absent
    pub sort_order: Option<SortOrder>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_params
            .get_or_insert_with(Filters::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }
}

/// Result of a load operation
///
/// In cursor mode `items` holds every row loaded so far in fetch order, in
/// page mode exactly the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult<T> {
    pub items: Vec<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationData>,
}

impl<T> LoadResult<T> {
    pub fn new(items: Vec<T>, pagination: Option<PaginationData>) -> Self {
        Self { items, pagination }
    }
}

//! Pagination data shapes and read-only snapshot views
//!
//! Backends report either cursor-style or page-style metadata. The
//! [`Pagination`] trait projects both onto one set of accessors; a field the
//! last update could not know is `None`, never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata of a cursor-paginated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPaginationData {
    /// Token for the next page, empty when there is none
    pub next_cursor: String,
    pub has_more: bool,
}

impl CursorPaginationData {
    pub fn new(next_cursor: impl Into<String>, has_more: bool) -> Self {
        Self {
            next_cursor: next_cursor.into(),
            has_more,
        }
    }

    /// Whether another page can be requested
    ///
    /// An empty cursor is terminal whatever `has_more` says.
    pub fn can_continue(&self) -> bool {
        self.has_more && !self.next_cursor.is_empty()
    }
}

/// Metadata of a numbered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePaginationData {
    /// 1-based
    pub current_page: usize,
    pub page_count: usize,
    pub per_page: usize,
    pub total_count: usize,
}

impl PagePaginationData {
    /// Compute metadata for `total_count` rows split into pages of `per_page`
    pub fn new(current_page: usize, per_page: usize, total_count: usize) -> Self {
        let page_count = if per_page == 0 {
            0
        } else {
            total_count.div_ceil(per_page)
        };

        Self {
            current_page,
            page_count,
            per_page,
            total_count,
        }
    }
}

/// Either pagination shape, discriminated by its field set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaginationData {
    Cursor(CursorPaginationData),
    Page(PagePaginationData),
}

impl PaginationData {
    pub fn as_cursor(&self) -> Option<&CursorPaginationData> {
        match self {
            PaginationData::Cursor(data) => Some(data),
            PaginationData::Page(_) => None,
        }
    }

    pub fn as_page(&self) -> Option<&PagePaginationData> {
        match self {
            PaginationData::Page(data) => Some(data),
            PaginationData::Cursor(_) => None,
        }
    }

    /// Whether a provider can advance past this page
    pub fn has_next(&self) -> bool {
        match self {
            PaginationData::Cursor(data) => data.can_continue(),
            PaginationData::Page(data) => data.current_page < data.page_count,
        }
    }
}

impl From<CursorPaginationData> for PaginationData {
    fn from(data: CursorPaginationData) -> Self {
        PaginationData::Cursor(data)
    }
}

impl From<PagePaginationData> for PaginationData {
    fn from(data: PagePaginationData) -> Self {
        PaginationData::Page(data)
    }
}

/// Read-only view over the last fetched page's metadata
///
/// Implementations never panic; missing data reads as `None`/`false`.
pub trait Pagination: Send + Sync + fmt::Debug {
    /// Total number of rows (page mode)
    fn total_count(&self) -> Option<usize>;

    /// Number of pages (page mode)
    fn page_count(&self) -> Option<usize>;

    /// Current 1-based page (page mode)
    fn current_page(&self) -> Option<usize>;

    /// Rows per page (page mode)
    fn page_size(&self) -> Option<usize>;

    /// Token for the next page (cursor mode, non-empty only)
    fn next_token(&self) -> Option<String>;

    /// Whether the backend reported more data
    ///
    /// Cursor data returns its `has_more` flag as stored; page data computes
    /// `current_page < page_count`.
    fn has_more(&self) -> bool;
}

fn page_field(
    data: Option<&PaginationData>,
    f: impl Fn(&PagePaginationData) -> usize,
) -> Option<usize> {
    data.and_then(PaginationData::as_page).map(f)
}

fn next_token_of(data: Option<&PaginationData>) -> Option<String> {
    data.and_then(PaginationData::as_cursor)
        .map(|c| c.next_cursor.clone())
        .filter(|token| !token.is_empty())
}

fn has_more_of(data: Option<&PaginationData>) -> bool {
    match data {
        Some(PaginationData::Cursor(c)) => c.has_more,
        Some(PaginationData::Page(p)) => p.current_page < p.page_count,
        None => false,
    }
}

/// Defines a snapshot type that wraps either pagination shape
macro_rules! data_pagination {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            data: Option<PaginationData>,
        }

        impl $name {
            pub fn new(data: Option<PaginationData>) -> Self {
                Self { data }
            }

            /// Replace the underlying data after a fetch
            pub fn update(&mut self, data: Option<PaginationData>) {
                self.data = data;
            }

            pub fn data(&self) -> Option<&PaginationData> {
                self.data.as_ref()
            }
        }

        impl Pagination for $name {
            fn total_count(&self) -> Option<usize> {
                page_field(self.data.as_ref(), |p| p.total_count)
            }

            fn page_count(&self) -> Option<usize> {
                page_field(self.data.as_ref(), |p| p.page_count)
            }

            fn current_page(&self) -> Option<usize> {
                page_field(self.data.as_ref(), |p| p.current_page)
            }

            fn page_size(&self) -> Option<usize> {
                page_field(self.data.as_ref(), |p| p.per_page)
            }

            fn next_token(&self) -> Option<String> {
                next_token_of(self.data.as_ref())
            }

            fn has_more(&self) -> bool {
                has_more_of(self.data.as_ref())
            }
        }
    };
}

data_pagination!(
    /// Snapshot of an in-memory provider's last page
    ArrayPagination
);

data_pagination!(
    /// Snapshot of a remote provider's last page
    HttpPagination
);

/// Snapshot of a search-after backend's last page
///
/// Search engines paginate by cursor yet still report a hit count, so the
/// total travels alongside the data instead of inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElasticPagination {
    data: Option<PaginationData>,
    total_hits: Option<usize>,
}

impl ElasticPagination {
    pub fn new(data: Option<PaginationData>, total_hits: Option<usize>) -> Self {
        Self { data, total_hits }
    }

    pub fn update(&mut self, data: Option<PaginationData>, total_hits: Option<usize>) {
        self.data = data;
        self.total_hits = total_hits;
    }

    pub fn data(&self) -> Option<&PaginationData> {
        self.data.as_ref()
    }
}

impl Pagination for ElasticPagination {
    fn total_count(&self) -> Option<usize> {
        page_field(self.data.as_ref(), |p| p.total_count).or(self.total_hits)
    }

    fn page_count(&self) -> Option<usize> {
        page_field(self.data.as_ref(), |p| p.page_count)
    }

    fn current_page(&self) -> Option<usize> {
        page_field(self.data.as_ref(), |p| p.current_page)
    }

    fn page_size(&self) -> Option<usize> {
        page_field(self.data.as_ref(), |p| p.per_page)
    }

    fn next_token(&self) -> Option<String> {
        next_token_of(self.data.as_ref())
    }

    fn has_more(&self) -> bool {
        has_more_of(self.data.as_ref())
    }
}

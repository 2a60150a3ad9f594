//! Core module containing the shared types and traits of the framework

pub mod error;
pub mod field;
pub mod pagination;
pub mod provider;
pub mod query;
pub mod request;

pub use error::{GridError, Result, StorageError};
pub use field::{FieldValue, Record};
pub use pagination::{
    ArrayPagination, CursorPaginationData, ElasticPagination, HttpPagination,
    PagePaginationData, Pagination, PaginationData,
};
pub use provider::{DataProvider, LoadingTracker};
pub use query::{Filters, LoadOptions, LoadResult, PaginationMode, SortOrder, SortState};
pub use request::PaginationRequest;

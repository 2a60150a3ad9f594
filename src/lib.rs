//! # Datagrid Provider
//!
//! Client-side data access for tabular UIs: where rows come from is decoupled
//! from how filter, sort and pagination state is tracked and persisted.
//!
//! ## Features
//!
//! - **One State Machine**: `load` / `load_more` / `refresh` / `set_page` behave
//!   the same over an in-memory array or a remote HTTP API
//! - **Two Pagination Paradigms**: cursor and page metadata behind a single
//!   read-only [`Pagination`](core::Pagination) view
//! - **Pluggable State**: filters, sort, page and cursor persisted in memory,
//!   the URL query string, the URL fragment or a key/value store
//! - **Response Adapters**: map any backend envelope to `items + pagination`
//! - **Best-Effort Persistence**: state storage never fails a caller; only
//!   data-source failures surface as errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datagrid::prelude::*;
//! use serde_json::json;
//!
//! let rows = vec![json!({"name": "Alice", "age": 25}), json!({"name": "Bob", "age": 35})];
//! let router = Arc::new(MemoryRouter::new());
//! let state = Arc::new(QueryParamsStateProvider::new(router, "users"));
//!
//! let provider = ArrayDataProvider::with_state_provider(rows, ArrayProviderConfig::page(10), state);
//! provider.set_sort("age", SortOrder::Desc);
//! let page = provider.load(LoadOptions::new().with_search_param("name", "a")).await?;
//! // URL now carries ?users-sort=-age&users-name=a&users-page=1
//! ```

pub mod config;
pub mod core;
pub mod http;
pub mod providers;
pub mod state;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        DataProvider, Pagination, Record, error::GridError, error::StorageError,
        field::FieldValue,
    };

    // === Core Types ===
    pub use crate::core::{
        ArrayPagination, CursorPaginationData, ElasticPagination, Filters, HttpPagination,
        LoadOptions, LoadResult, PagePaginationData, PaginationData, PaginationMode,
        PaginationRequest, SortOrder, SortState,
    };

    // === Providers ===
    pub use crate::providers::{ArrayDataProvider, HttpDataProvider};

    // === State ===
    pub use crate::state::{
        HashStateProvider, InMemoryStateProvider, LocalStorageStateProvider, MemoryRouter,
        QueryParamsStateProvider, Route, RouteUpdate, Router, StateProvider,
    };

    // === Storage ===
    pub use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

    // === HTTP ===
    #[cfg(feature = "reqwest")]
    pub use crate::http::ReqwestHttpClient;
    pub use crate::http::{
        DefaultResponseAdapter, ElasticResponseAdapter, HttpClient, LegacyResponseAdapter,
        ResponseAdapter,
    };

    // === Config ===
    pub use crate::config::{
        ArrayProviderConfig, GridConfig, HttpProviderConfig, StateBackends, StateProviderConfig,
    };

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}

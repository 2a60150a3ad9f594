//! Data provider implementations
//!
//! Both providers run the same load / load_more / refresh / set_page state
//! machine and differ only in where rows come from.

pub mod array;
pub mod http;

pub use array::ArrayDataProvider;
pub use http::HttpDataProvider;

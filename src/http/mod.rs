//! Remote data source plumbing: the HTTP client boundary and response adapters

pub mod adapter;
#[cfg(feature = "reqwest")]
pub mod client;

pub use adapter::{
    DefaultResponseAdapter, ElasticResponseAdapter, LegacyResponseAdapter, ResponseAdapter,
};
#[cfg(feature = "reqwest")]
pub use client::ReqwestHttpClient;

use crate::core::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Performs the network request for a data provider
///
/// Implementations return the parsed response body and fail on any non-2xx
/// status. Timeouts are the client's concern.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<Value>;
}

//! Shared test harness for state provider and data provider testing
//!
//! Provides the `state_provider_tests!` contract suite, a scripted
//! [`HttpClient`] that records every requested URL, and row fixtures.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod state_harness;
//! use state_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod state_provider_tests;

use async_trait::async_trait;
use datagrid::core::error::{GridError, Result};
use datagrid::http::HttpClient;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Route library logs to the test output; `RUST_LOG` selects the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Row fixtures
// ---------------------------------------------------------------------------

/// Five people with distinct names and ages
pub fn people() -> Vec<Value> {
    vec![
        json!({"name": "Alice", "age": 25}),
        json!({"name": "Bob", "age": 35}),
        json!({"name": "Charlie", "age": 30}),
        json!({"name": "David", "age": 40}),
        json!({"name": "Eve", "age": 45}),
    ]
}

/// Names of the given rows, in order
pub fn names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item["name"].as_str().map(str::to_string))
        .collect()
}

// ---------------------------------------------------------------------------
// ScriptedClient: replays queued responses and records URLs
// ---------------------------------------------------------------------------

/// Test double for [`HttpClient`]
///
/// Responses are served in the order they were queued. Once the queue is
/// exhausted every request fails with a transport error.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response
    pub fn respond(&self, body: Value) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    /// Queue a failure
    pub fn fail(&self, error: GridError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Every URL requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, url: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GridError::Transport {
                    url: url.to_string(),
                    message: "no scripted response".to_string(),
                })
            })
    }
}

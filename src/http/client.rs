//! HttpClient implementation using reqwest

use crate::core::error::{GridError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Thin reqwest wrapper: GET, require 2xx, parse JSON
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    http: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client (shared pool, custom headers, ...)
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Client with a per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GridError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { http })
    }
}

fn transport(url: &str, err: reqwest::Error) -> GridError {
    GridError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!(url = %url, "Sending request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| transport(url, e))?;
        Ok(serde_json::from_str(&body)?)
    }
}

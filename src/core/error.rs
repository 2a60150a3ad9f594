//! Typed error handling for data providers
//!
//! Only failures that originate from a data source are surfaced to callers.
//! State persistence is best-effort: the storage layer reports its failures
//! through [`StorageError`], and the state providers log and discard them.
//!
//! # Error Categories
//!
//! - [`GridError`]: returned by `load()`, `load_more()`, `refresh()` and
//!   `set_page()` when the backend could not deliver a page
//! - [`StorageError`]: returned by [`KeyValueStorage`](crate::storage::KeyValueStorage)
//!   writes, never by a state provider
//!
//! # Example
//!
//! ```rust,ignore
//! match provider.load(LoadOptions::default()).await {
//!     Ok(result) => render(result.items),
//!     Err(GridError::Status { status, .. }) if status == 401 => redirect_to_login(),
//!     Err(e) => show_error(e.to_string()),
//! }
//! ```

use thiserror::Error;

/// Result type alias for data provider operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Message used when an adapter reports a failure without a reason
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Errors surfaced by data provider operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("Request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response adapter rejected an otherwise successful response
    #[error("{message}")]
    Application { message: String },

    /// Rows in the response could not be decoded into the item type
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl GridError {
    /// Build an application failure, falling back to the generic message
    pub fn application(message: Option<String>) -> Self {
        GridError::Application {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GridError::Transport { .. } => "TRANSPORT_ERROR",
            GridError::Status { .. } => "HTTP_STATUS_ERROR",
            GridError::Application { .. } => "APPLICATION_ERROR",
            GridError::Decode { .. } => "DECODE_ERROR",
        }
    }

    /// Whether the failure happened at the transport level
    pub fn is_transport(&self) -> bool {
        matches!(self, GridError::Transport { .. } | GridError::Status { .. })
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Decode {
            message: err.to_string(),
        }
    }
}

/// Errors reported by a key/value storage backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Writing the value would exceed the backend's capacity
    #[error("Storage quota of {limit} bytes exceeded while writing '{key}'")]
    QuotaExceeded { key: String, limit: usize },

    /// The backend failed to persist the value
    #[error("Failed to write '{key}': {message}")]
    Io { key: String, message: String },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QuotaExceeded { .. } => "STORAGE_QUOTA_EXCEEDED",
            StorageError::Io { .. } => "STORAGE_IO_ERROR",
        }
    }
}

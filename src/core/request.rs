//! Outgoing pagination parameters

use serde::{Deserialize, Serialize};

/// Describes how a page advance is serialized into request parameters
///
/// Fields are public and meant to be rewritten before each request. `limit`
/// is passed through as given, zero and negative values included.
///
/// # Example
/// ```rust,ignore
/// let request = PaginationRequest {
///     limit: 50,
///     ..PaginationRequest::default()
/// };
/// assert_eq!(request.next_param_name, "page");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationRequest {
    /// Current cursor or page number, empty on the first page
    pub next: String,

    /// Page size
    pub limit: i64,

    pub next_param_name: String,

    pub limit_param_name: String,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            next: String::new(),
            limit: 20,
            next_param_name: "page".to_string(),
            limit_param_name: "pageSize".to_string(),
        }
    }
}

impl PaginationRequest {
    pub fn new(next: impl Into<String>, limit: i64) -> Self {
        Self {
            next: next.into(),
            limit,
            ..Self::default()
        }
    }

    pub fn with_param_names(
        mut self,
        next_param_name: impl Into<String>,
        limit_param_name: impl Into<String>,
    ) -> Self {
        self.next_param_name = next_param_name.into();
        self.limit_param_name = limit_param_name.into();
        self
    }

    /// Query pairs for this request; `next` is omitted while empty
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2);
        if !self.next.is_empty() {
            pairs.push((self.next_param_name.clone(), self.next.clone()));
        }
        pairs.push((self.limit_param_name.clone(), self.limit.to_string()));
        pairs
    }
}

//! Configuration loading and management

use crate::core::query::PaginationMode;
use crate::core::request::PaginationRequest;
use crate::state::{
    DEFAULT_PREFIX, DEFAULT_STORAGE_KEY, HashStateProvider, InMemoryStateProvider,
    LocalStorageStateProvider, QueryParamsStateProvider, Router, StateProvider,
};
use crate::storage::KeyValueStorage;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default rows per page for both providers
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn read_yaml_file<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Configuration for an [`ArrayDataProvider`](crate::providers::ArrayDataProvider)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayProviderConfig {
    /// Rows per page; zero is treated as one
    pub page_size: usize,

    pub pagination_mode: PaginationMode,

    /// When false every matching row is returned at once
    pub pagination_enabled: bool,

    /// Artificial latency before each load, keeps `is_loading()` observable
    pub load_delay_ms: u64,
}

impl Default for ArrayProviderConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pagination_mode: PaginationMode::Cursor,
            pagination_enabled: true,
            load_delay_ms: 10,
        }
    }
}

impl ArrayProviderConfig {
    /// Cursor-mode configuration
    pub fn cursor(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Page-mode configuration
    pub fn page(page_size: usize) -> Self {
        Self {
            page_size,
            pagination_mode: PaginationMode::Page,
            ..Self::default()
        }
    }

    /// Return every row in one load
    pub fn unpaginated() -> Self {
        Self {
            pagination_enabled: false,
            ..Self::default()
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        read_yaml_file(path)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Configuration for an [`HttpDataProvider`](crate::providers::HttpDataProvider)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpProviderConfig {
    /// Endpoint; may already carry a query string
    pub url: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub pagination_mode: PaginationMode,

    /// Overrides `pagination.cursor` / `page`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_param_name: Option<String>,

    /// Overrides `pagination.page_size` / `per-page`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_param_name: Option<String>,
}

impl HttpProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            pagination_mode: PaginationMode::Cursor,
            next_param_name: None,
            limit_param_name: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_mode(mut self, mode: PaginationMode) -> Self {
        self.pagination_mode = mode;
        self
    }

    pub fn with_param_names(
        mut self,
        next_param_name: impl Into<String>,
        limit_param_name: impl Into<String>,
    ) -> Self {
        self.next_param_name = Some(next_param_name.into());
        self.limit_param_name = Some(limit_param_name.into());
        self
    }

    /// Pagination parameters for a request positioned at `next`
    pub fn pagination_request(&self, next: impl Into<String>) -> PaginationRequest {
        let (next_name, limit_name) = match self.pagination_mode {
            PaginationMode::Cursor => ("pagination.cursor", "pagination.page_size"),
            PaginationMode::Page => ("page", "per-page"),
        };

        PaginationRequest {
            next: next.into(),
            limit: i64::try_from(self.page_size).unwrap_or(i64::MAX),
            next_param_name: self
                .next_param_name
                .clone()
                .unwrap_or_else(|| next_name.to_string()),
            limit_param_name: self
                .limit_param_name
                .clone()
                .unwrap_or_else(|| limit_name.to_string()),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        read_yaml_file(path)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Which state provider backs a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateProviderConfig {
    #[default]
    Memory,
    QueryParams {
        #[serde(default = "default_prefix")]
        prefix: String,
    },
    Hash {
        #[serde(default = "default_prefix")]
        prefix: String,
    },
    LocalStorage {
        #[serde(default = "default_storage_key")]
        key: String,
    },
}

/// Collaborators available to [`StateProviderConfig::build`]
#[derive(Clone, Default)]
pub struct StateBackends {
    pub router: Option<Arc<dyn Router>>,
    pub storage: Option<Arc<dyn KeyValueStorage>>,
}

impl StateBackends {
    pub fn with_router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }
}

impl StateProviderConfig {
    /// Instantiate the configured provider
    ///
    /// A missing router or storage falls back to in-memory state with a
    /// warning.
    pub fn build(&self, backends: &StateBackends) -> Arc<dyn StateProvider> {
        match self {
            StateProviderConfig::Memory => Arc::new(InMemoryStateProvider::new()),
            StateProviderConfig::QueryParams { prefix } => match &backends.router {
                Some(router) => Arc::new(QueryParamsStateProvider::new(router.clone(), prefix)),
                None => Self::fallback("query_params", "router"),
            },
            StateProviderConfig::Hash { prefix } => match &backends.router {
                Some(router) => Arc::new(HashStateProvider::new(router.clone(), prefix)),
                None => Self::fallback("hash", "router"),
            },
            StateProviderConfig::LocalStorage { key } => match &backends.storage {
                Some(storage) => Arc::new(LocalStorageStateProvider::new(storage.clone(), key)),
                None => Self::fallback("local_storage", "storage"),
            },
        }
    }

    fn fallback(kind: &str, missing: &str) -> Arc<dyn StateProvider> {
        tracing::warn!(
            state_provider = kind,
            missing = missing,
            "State provider needs a collaborator that was not supplied, using in-memory state"
        );
        Arc::new(InMemoryStateProvider::new())
    }
}

/// Complete grid configuration as loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub state: StateProviderConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayProviderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpProviderConfig>,
}

impl GridConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        read_yaml_file(path)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryRouter;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_array_defaults() {
        let config = ArrayProviderConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.pagination_mode, PaginationMode::Cursor);
        assert!(config.pagination_enabled);
        assert_eq!(config.load_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_http_param_names_follow_mode() {
        let cursor = HttpProviderConfig::new("/api").pagination_request("abc");
        assert_eq!(cursor.next_param_name, "pagination.cursor");
        assert_eq!(cursor.limit_param_name, "pagination.page_size");
        assert_eq!(cursor.limit, 10);

        let page = HttpProviderConfig::new("/api")
            .with_mode(PaginationMode::Page)
            .pagination_request("2");
        assert_eq!(page.next_param_name, "page");
        assert_eq!(page.limit_param_name, "per-page");
    }

    #[test]
    fn test_http_param_name_overrides() {
        let request = HttpProviderConfig::new("/api")
            .with_param_names("after", "size")
            .pagination_request("");
        assert_eq!(request.next_param_name, "after");
        assert_eq!(request.limit_param_name, "size");
    }

    #[test]
    fn test_state_config_yaml() {
        let config = GridConfig::from_yaml_str(
            r#"
state:
  type: query_params
  prefix: users
http:
  url: https://api.example.com/users
  pagination_mode: page
  page_size: 25
"#,
        )
        .unwrap();

        assert_eq!(
            config.state,
            StateProviderConfig::QueryParams {
                prefix: "users".to_string()
            }
        );
        let http = config.http.unwrap();
        assert_eq!(http.pagination_mode, PaginationMode::Page);
        assert_eq!(http.page_size, 25);
        assert!(config.array.is_none());
    }

    #[test]
    fn test_state_config_defaults() {
        let config: StateProviderConfig = serde_yaml::from_str("type: local_storage").unwrap();
        assert_eq!(
            config,
            StateProviderConfig::LocalStorage {
                key: "grid-state".to_string()
            }
        );
        assert_eq!(GridConfig::default().state, StateProviderConfig::Memory);
    }

    #[test]
    fn test_build_falls_back_without_collaborators() {
        let state = StateProviderConfig::Hash {
            prefix: "g".to_string(),
        }
        .build(&StateBackends::default());
        state.set_filter("name", "x");
        assert_eq!(state.filter("name").as_deref(), Some("x"));
    }

    #[test]
    fn test_build_with_collaborators() {
        let router = Arc::new(MemoryRouter::new());
        let storage = Arc::new(MemoryStorage::new());
        let backends = StateBackends::default()
            .with_router(router.clone())
            .with_storage(storage.clone());

        StateProviderConfig::QueryParams {
            prefix: "p".to_string(),
        }
        .build(&backends)
        .set_page(2);
        assert!(router.current_route().query.contains_key("p-page"));

        StateProviderConfig::LocalStorage {
            key: "k".to_string(),
        }
        .build(&backends)
        .set_page(2);
        assert!(storage.get_item("k").is_some());
    }
}

//! Translation from backend response envelopes to items + pagination
//!
//! A [`ResponseAdapter`] knows one backend's response shape. Adapters may keep
//! their own bookkeeping (for instance the page size last requested) when the
//! backend does not echo it; [`ResponseAdapter::prepare_request`] is called
//! before every fetch for that purpose.

use crate::core::error::Result;
use crate::core::pagination::{CursorPaginationData, PagePaginationData, PaginationData};
use crate::core::request::PaginationRequest;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

/// Backend-specific response translation
pub trait ResponseAdapter<T>: Send + Sync {
    /// Pull the rows out of the response envelope
    fn extract_items(&self, response: &Value) -> Result<Vec<T>>;

    /// Pagination metadata, `None` when the response carries none
    fn extract_pagination(&self, response: &Value) -> Option<PaginationData>;

    /// Whether the backend reported success
    fn is_success(&self, _response: &Value) -> bool {
        true
    }

    /// Human readable failure reason
    fn error_message(&self, _response: &Value) -> Option<String> {
        None
    }

    /// Total hit count reported outside the pagination data
    fn total_hits(&self, _response: &Value) -> Option<usize> {
        None
    }

    /// Called with the outgoing pagination parameters before each request
    fn prepare_request(&self, _request: &PaginationRequest) {}
}

/// Decode every row of a JSON array into `T`
pub fn decode_rows<T: DeserializeOwned>(rows: Option<&Value>) -> Result<Vec<T>> {
    let Some(Value::Array(rows)) = rows else {
        return Ok(Vec::new());
    };

    rows.iter()
        .map(|row| Ok(serde_json::from_value(row.clone())?))
        .collect()
}

fn as_count(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn as_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `{ nextCursor, hasMore? }` at the top level
fn cursor_pagination(response: &Value) -> Option<PaginationData> {
    let next_cursor = response.get("nextCursor").filter(|v| !v.is_null())?;
    let has_more = response
        .get("hasMore")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(CursorPaginationData::new(as_token(next_cursor), has_more).into())
}

/// `{ pagination: { currentPage, pageCount, perPage, totalCount } }`, each defaulted
fn page_pagination(response: &Value) -> Option<PaginationData> {
    let pagination = response.get("pagination").filter(|v| v.is_object())?;

    Some(
        PagePaginationData {
            current_page: as_count(pagination.get("currentPage")).unwrap_or(1),
            page_count: as_count(pagination.get("pageCount")).unwrap_or(1),
            per_page: as_count(pagination.get("perPage")).unwrap_or(10),
            total_count: as_count(pagination.get("totalCount")).unwrap_or(0),
        }
        .into(),
    )
}

/// Rows under `items` (or `data`), cursor or page metadata alongside
///
/// ```json
/// { "items": [...], "nextCursor": "abc", "hasMore": true }
/// { "data": [...], "pagination": { "currentPage": 1, "pageCount": 5, "perPage": 10, "totalCount": 50 } }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseAdapter;

impl<T: DeserializeOwned> ResponseAdapter<T> for DefaultResponseAdapter {
    fn extract_items(&self, response: &Value) -> Result<Vec<T>> {
        let rows = response
            .get("items")
            .filter(|v| v.is_array())
            .or_else(|| response.get("data"));
        decode_rows(rows)
    }

    fn extract_pagination(&self, response: &Value) -> Option<PaginationData> {
        cursor_pagination(response).or_else(|| page_pagination(response))
    }
}

/// Older envelope with an explicit success flag
///
/// ```json
/// { "success": false, "error": "Session expired", "data": [] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyResponseAdapter;

impl<T: DeserializeOwned> ResponseAdapter<T> for LegacyResponseAdapter {
    fn extract_items(&self, response: &Value) -> Result<Vec<T>> {
        decode_rows(response.get("data"))
    }

    fn extract_pagination(&self, response: &Value) -> Option<PaginationData> {
        cursor_pagination(response).or_else(|| page_pagination(response))
    }

    fn is_success(&self, response: &Value) -> bool {
        response.get("success").and_then(Value::as_bool) != Some(false)
    }

    fn error_message(&self, response: &Value) -> Option<String> {
        ["error", "message"]
            .iter()
            .find_map(|key| response.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

/// Search-after responses from a search engine
///
/// Rows are the hits' `_source` documents. The next cursor is the JSON-encoded
/// `sort` array of the last hit, and is empty once a page comes back shorter
/// than the requested size. The requested size is remembered from
/// [`ResponseAdapter::prepare_request`] since the engine does not echo it.
///
/// ```json
/// { "hits": { "total": { "value": 120 }, "hits": [ { "_source": {...}, "sort": [1700000000, "id-9"] } ] } }
/// ```
#[derive(Debug, Default)]
pub struct ElasticResponseAdapter {
    requested_size: AtomicI64,
}

impl ElasticResponseAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn hits<'a>(&self, response: &'a Value) -> &'a [Value] {
        response
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl<T: DeserializeOwned> ResponseAdapter<T> for ElasticResponseAdapter {
    fn extract_items(&self, response: &Value) -> Result<Vec<T>> {
        self.hits(response)
            .iter()
            .filter_map(|hit| hit.get("_source"))
            .map(|source| Ok(serde_json::from_value(source.clone())?))
            .collect()
    }

    fn extract_pagination(&self, response: &Value) -> Option<PaginationData> {
        response.get("hits")?;

        let hits = self.hits(response);
        let requested = self.requested_size.load(Ordering::SeqCst);
        let full_page = requested > 0 && hits.len() as i64 >= requested;

        let next_cursor = match hits.last().and_then(|hit| hit.get("sort")) {
            Some(sort) if full_page => sort.to_string(),
            _ => String::new(),
        };
        let has_more = !next_cursor.is_empty();

        Some(CursorPaginationData::new(next_cursor, has_more).into())
    }

    fn is_success(&self, response: &Value) -> bool {
        response.get("error").is_none()
    }

    fn error_message(&self, response: &Value) -> Option<String> {
        let error = response.get("error")?;
        error
            .pointer("/root_cause/0/reason")
            .or_else(|| error.get("reason"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
    }

    fn total_hits(&self, response: &Value) -> Option<usize> {
        let total = response.pointer("/hits/total")?;
        as_count(total.get("value")).or_else(|| as_count(Some(total)))
    }

    fn prepare_request(&self, request: &PaginationRequest) {
        self.requested_size.store(request.limit, Ordering::SeqCst);
    }
}

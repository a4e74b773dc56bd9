//! Response envelopes for list endpoints
//!
//! Successful responses carry the page of items plus enough metadata for a
//! client to page through the collection:
//!
//! ```json
//! { "items": [...], "total": 57, "page": 2, "pageSize": 20 }
//! ```
//!
//! Failures carry a single fixed message:
//!
//! ```json
//! { "error": "Unauthorized" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::pagination::PageWindow;

/// One page of a collection
///
/// # Example
///
/// ```rust
/// use listing_service::listing::{ListResult, PageWindow};
///
/// let result = ListResult::new(vec!["a", "b"], 42, PageWindow::normalize(Some("3"), Some("2")));
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["total"], 42);
/// assert_eq!(json["pageSize"], 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// Records on this page, newest first
    pub items: Vec<T>,
    /// Records in the whole collection
    pub total: u64,
    /// Normalized page number
    pub page: u64,
    /// Normalized page size
    pub page_size: u64,
}

impl<T> ListResult<T> {
    /// Envelope for `items` under the given window
    pub fn new(items: Vec<T>, total: u64, window: PageWindow) -> Self {
        Self {
            items,
            total,
            page: window.page,
            page_size: window.page_size,
        }
    }
}

impl<T: Serialize> IntoResponse for ListResult<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body of every failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Fixed, client-safe message
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_result_field_names() {
        let result = ListResult::new(vec![json!({"id": 1})], 1, PageWindow::default());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"items": [{"id": 1}], "total": 1, "page": 1, "pageSize": 20})
        );
    }

    #[test]
    fn test_list_result_is_ok() {
        let result: ListResult<u8> = ListResult::new(Vec::new(), 0, PageWindow::default());
        assert_eq!(result.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn test_error_envelope_shape() {
        assert_eq!(
            serde_json::to_value(ErrorEnvelope::new("List failed")).unwrap(),
            json!({"error": "List failed"})
        );
    }
}

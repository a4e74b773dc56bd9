//! PostgREST-compatible remote store
//!
//! Reads collections over HTTP from a PostgREST endpoint (`{url}/rest/v1/{collection}`).
//! Slicing uses the `Range` request header and the exact count is taken from
//! the `Content-Range` response header, requested with `Prefer: count=exact`.
//!
//! The endpoint URL and privileged key both come from configuration. Missing
//! values do not stop the service from starting; handle construction fails
//! instead, which the list handler turns into a redacted 500.

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};

use super::error::{StoreError, StoreOperation};
use super::record::{validate_collection_name, Record, RecordRange, StorePage, CREATED_AT};
use super::traits::{CollectionStore, StoreProvider, StoreResult};
use crate::config::BackendConfig;
use crate::error::{Error, Result};

/// Path prefix PostgREST serves tables under
const REST_PATH: &str = "rest/v1";

/// Longest backend error body kept for logs
const MAX_LOGGED_BODY: usize = 512;

/// Remote store speaking the PostgREST range protocol
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: Option<String>,
    key: Option<String>,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base_url", &self.base_url)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RestBackend {
    /// Build the HTTP client; URL and key may be absent
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = non_blank(config.url.as_deref()).map(|url| url.trim_end_matches('/').to_string());
        let key = non_blank(config.key.as_deref()).map(str::to_string);

        if base_url.is_none() || key.is_none() {
            tracing::warn!(
                url_configured = base_url.is_some(),
                key_configured = key.is_some(),
                "Remote store is not fully configured; list requests will fail"
            );
        }

        Ok(Self {
            client,
            base_url,
            key,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl StoreProvider for RestBackend {
    type Collection = RestCollection;

    fn collection(&self, name: &str) -> StoreResult<RestCollection> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| StoreError::misconfigured("backend URL is not configured"))?;
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| StoreError::misconfigured("backend key is not configured"))?;

        Ok(RestCollection {
            client: self.client.clone(),
            table_url: format!("{}/{}/{}", base_url, REST_PATH, name),
            name: name.to_string(),
            key: key.to_string(),
        })
    }

    fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.key.is_some()
    }
}

/// Handle onto one remote collection
#[derive(Clone)]
pub struct RestCollection {
    client: Client,
    table_url: String,
    name: String,
    key: String,
}

impl std::fmt::Debug for RestCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCollection")
            .field("table_url", &self.table_url)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CollectionStore for RestCollection {
    async fn query(&self, range: RecordRange) -> StoreResult<StorePage> {
        validate_collection_name(&self.name)?;

        let order = format!("{}.{}", CREATED_AT, range.direction);
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", order.as_str())])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Range-Unit", "items")
            .header(RANGE, format!("{}-{}", range.offset, range.end_inclusive))
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| {
                let error = if e.is_timeout() {
                    StoreError::timeout(e.to_string())
                } else {
                    StoreError::connection_failed(e.to_string())
                };
                error.with_collection(&self.name)
            })?;

        let status = response.status();
        let exact_count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(parse_content_range);

        // Offset past the last row
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(StorePage {
                records: Some(Vec::new()),
                exact_count,
            });
        }

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_LOGGED_BODY {
                let mut cut = MAX_LOGGED_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(StoreError::query_failed(format!(
                "backend returned {}: {}",
                status, body
            ))
            .with_collection(&self.name));
        }

        let records: Option<Vec<Record>> = response.json().await.map_err(|e| {
            StoreError::decode_failed(StoreOperation::Decode, e.to_string()).with_collection(&self.name)
        })?;

        tracing::debug!(
            collection = %self.name,
            status = status.as_u16(),
            returned = records.as_ref().map_or(0, Vec::len),
            total = ?exact_count,
            "Queried remote collection"
        );

        Ok(StorePage {
            records,
            exact_count,
        })
    }
}

/// Extract the total from a `Content-Range` value such as `0-19/150` or `*/0`
///
/// Returns `None` when the total is unknown (`*`) or the value is malformed.
///
/// # Example
///
/// ```rust
/// use listing_service::store::parse_content_range;
/// use reqwest::header::HeaderValue;
///
/// assert_eq!(parse_content_range(&HeaderValue::from_static("0-19/150")), Some(150));
/// assert_eq!(parse_content_range(&HeaderValue::from_static("*/0")), Some(0));
/// assert_eq!(parse_content_range(&HeaderValue::from_static("0-19/*")), None);
/// ```
pub fn parse_content_range(value: &HeaderValue) -> Option<u64> {
    let value = value.to_str().ok()?;
    let (_, total) = value.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use crate::store::StoreErrorKind;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::Arc;

    fn backend_config(url: Option<String>, key: Option<&str>) -> BackendConfig {
        BackendConfig {
            kind: BackendKind::Rest,
            url,
            key: key.map(str::to_string),
            timeout_secs: 5,
            seed_path: None,
        }
    }

    fn rows(n: u64) -> Vec<serde_json::Value> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // Newest first, as the server would sort them
        (0..n)
            .rev()
            .map(|i| {
                serde_json::json!({
                    "id": i,
                    "created_at": (base + ChronoDuration::minutes(i as i64)).to_rfc3339(),
                })
            })
            .collect()
    }

    /// Minimal PostgREST stand-in serving one table named `orders`
    async fn fake_postgrest(
        State(table): State<Arc<Vec<serde_json::Value>>>,
        headers: HeaderMap,
    ) -> Response {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("service-key") {
            return (AxumStatus::UNAUTHORIZED, "bad key").into_response();
        }
        if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("count=exact") {
            return (AxumStatus::BAD_REQUEST, "count not requested").into_response();
        }

        let total = table.len();
        let (from, to) = headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split_once('-'))
            .map(|(a, b)| (a.parse::<usize>().unwrap(), b.parse::<usize>().unwrap()))
            .unwrap();

        if from >= total && total > 0 {
            return (
                AxumStatus::RANGE_NOT_SATISFIABLE,
                [("content-range", format!("*/{}", total))],
                "",
            )
                .into_response();
        }

        let slice: Vec<_> = table.iter().skip(from).take(to - from + 1).cloned().collect();
        let content_range = if slice.is_empty() {
            format!("*/{}", total)
        } else {
            format!("{}-{}/{}", from, from + slice.len() - 1, total)
        };
        (
            AxumStatus::PARTIAL_CONTENT,
            [("content-range", content_range)],
            Json(slice),
        )
            .into_response()
    }

    async fn spawn_backend(table: Vec<serde_json::Value>) -> String {
        let app = Router::new()
            .route("/rest/v1/orders", get(fake_postgrest))
            .route(
                "/rest/v1/broken",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "relation exploded") }),
            )
            .route(
                "/rest/v1/garbled",
                get(|| async { (AxumStatus::OK, [("content-range", "0-0/1")], "not json") }),
            )
            .with_state(Arc::new(table));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn ids(page: &StorePage) -> Vec<u64> {
        page.records
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.field("id").and_then(|v| v.as_u64()).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_content_range() {
        let parse = |s: &'static str| parse_content_range(&HeaderValue::from_static(s));
        assert_eq!(parse("0-19/150"), Some(150));
        assert_eq!(parse("50-99/150"), Some(150));
        assert_eq!(parse("*/42"), Some(42));
        assert_eq!(parse("0-19/*"), None);
        assert_eq!(parse("garbage"), None);
    }

    #[test]
    fn test_missing_url_is_misconfigured() {
        let backend = RestBackend::new(&backend_config(None, Some("k"))).unwrap();
        assert!(!backend.is_configured());
        let err = backend.collection("orders").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Misconfigured);
    }

    #[test]
    fn test_blank_key_is_misconfigured() {
        let backend =
            RestBackend::new(&backend_config(Some("http://db".to_string()), Some("  "))).unwrap();
        let err = backend.collection("orders").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Misconfigured);
    }

    #[test]
    fn test_debug_redacts_key() {
        let backend = RestBackend::new(&backend_config(
            Some("http://db".to_string()),
            Some("super-secret"),
        ))
        .unwrap();
        let debug = format!("{:?}", backend);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));

        let collection = backend.collection("orders").unwrap();
        assert!(!format!("{:?}", collection).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_queries_slice_with_exact_count() {
        let url = spawn_backend(rows(150)).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("service-key"))).unwrap();

        let page = backend
            .collection("orders")
            .unwrap()
            .query(RecordRange::new(50, 99))
            .await
            .unwrap();

        let expected: Vec<u64> = (50..100).map(|rank| 149 - rank).collect();
        assert_eq!(ids(&page), expected);
        assert_eq!(page.exact_count, Some(150));
    }

    #[tokio::test]
    async fn test_range_not_satisfiable_is_empty() {
        let url = spawn_backend(rows(3)).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("service-key"))).unwrap();

        let page = backend
            .collection("orders")
            .unwrap()
            .query(RecordRange::new(20, 39))
            .await
            .unwrap();

        assert_eq!(page.records, Some(vec![]));
        assert_eq!(page.exact_count, Some(3));
    }

    #[tokio::test]
    async fn test_empty_table() {
        let url = spawn_backend(Vec::new()).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("service-key"))).unwrap();

        let page = backend
            .collection("orders")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap();
        assert_eq!(page, StorePage::new(vec![], 0));
    }

    #[tokio::test]
    async fn test_backend_error_status_is_query_failure() {
        let url = spawn_backend(Vec::new()).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("service-key"))).unwrap();

        let err = backend
            .collection("broken")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::QueryFailed);
        assert!(err.message.contains("relation exploded"));
        assert_eq!(err.collection.as_deref(), Some("broken"));
    }

    #[tokio::test]
    async fn test_wrong_key_is_query_failure() {
        let url = spawn_backend(rows(1)).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("wrong"))).unwrap();

        let err = backend
            .collection("orders")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::QueryFailed);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_failure() {
        let url = spawn_backend(Vec::new()).await;
        let backend = RestBackend::new(&backend_config(Some(url), Some("service-key"))).unwrap();

        let err = backend
            .collection("garbled")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::DecodeFailed);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = RestBackend::new(&backend_config(
            Some(format!("http://{}", addr)),
            Some("service-key"),
        ))
        .unwrap();
        let err = backend
            .collection("orders")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap_err();
        assert!(err.is_retriable());
    }

    #[tokio::test]
    async fn test_malformed_collection_never_reaches_backend() {
        let backend = RestBackend::new(&backend_config(
            Some("http://127.0.0.1:9".to_string()),
            Some("service-key"),
        ))
        .unwrap();
        let err = backend
            .collection("orders?select=password")
            .unwrap()
            .query(RecordRange::new(0, 19))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidCollection);
    }
}

//! Request context for list endpoints
//!
//! The list handler sees exactly two things about a request: its query
//! parameters and its cookies. Extraction never rejects: each of `page` and
//! `pageSize` takes its first occurrence, an unreadable query string falls
//! back to default parameters and unparsable cookies are skipped.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use cookie::Cookie;

use super::pagination::RawListParams;

/// Query parameters and cookies of one list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    params: RawListParams,
    cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Context with the given parameters and no cookies
    pub fn new(params: RawListParams) -> Self {
        Self {
            params,
            cookies: HashMap::new(),
        }
    }

    /// Add a cookie
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Build from request parts
    pub fn from_parts(parts: &Parts) -> Self {
        let params = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => params_from_pairs(pairs),
            Err(rejection) => {
                tracing::debug!(
                    query = ?parts.uri.query(),
                    error = %rejection,
                    "Unreadable query string, using default list parameters"
                );
                RawListParams::default()
            }
        };

        let mut cookies = HashMap::new();
        for value in parts.headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for cookie in Cookie::split_parse(value).flatten() {
                // First occurrence wins, as browsers send the most specific path first
                cookies
                    .entry(cookie.name().to_string())
                    .or_insert_with(|| cookie.value().to_string());
            }
        }

        Self { params, cookies }
    }

    /// Raw `page` / `pageSize` values
    pub fn query_params(&self) -> &RawListParams {
        &self.params
    }

    /// Cookies by name
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }
}

/// First `page` and first `pageSize`, each independent of the other
fn params_from_pairs(pairs: Vec<(String, String)>) -> RawListParams {
    let mut params = RawListParams::default();
    for (key, value) in pairs {
        let slot = match key.as_str() {
            "page" => &mut params.page,
            "pageSize" => &mut params.page_size,
            _ => continue,
        };
        slot.get_or_insert(value);
    }
    params
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

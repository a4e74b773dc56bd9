//! List endpoint errors
//!
//! Every failure maps to a fixed status and a fixed client message. Store
//! details go to the log, never to the client.
//!
//! | Error          | Status | Body                           |
//! |----------------|--------|--------------------------------|
//! | `Unauthorized` | 401    | `{"error":"Unauthorized"}`     |
//! | `Misconfigured`| 500    | `{"error":"Internal error"}`   |
//! | `StoreQuery`   | 500    | `{"error":"List failed"}`      |
//! | `Unexpected`   | 500    | `{"error":"<message>"}`        |

use std::any::Any;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::response::ErrorEnvelope;
use crate::store::StoreError;

/// Message for missing session carriers
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Message for configuration and unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// Message for store query failures
pub const LIST_FAILED_MESSAGE: &str = "List failed";

/// Failure of a single list request
#[derive(Debug)]
pub enum ListError {
    /// Neither session carrier was present
    Unauthorized,
    /// The store could not hand out a collection handle
    Misconfigured(StoreError),
    /// The store query failed
    StoreQuery(StoreError),
    /// The handler panicked
    ///
    /// Holds the panic message only when it was a string literal; anything
    /// else is reported as an internal error.
    Unexpected(Option<&'static str>),
}

impl ListError {
    /// Convert a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::Unexpected(payload.downcast_ref::<&'static str>().copied())
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Misconfigured(_) | Self::StoreQuery(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
            Self::Misconfigured(_) => INTERNAL_ERROR_MESSAGE,
            Self::StoreQuery(_) => LIST_FAILED_MESSAGE,
            Self::Unexpected(message) => message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "No session carrier present"),
            Self::Misconfigured(err) => write!(f, "Store misconfigured: {}", err),
            Self::StoreQuery(err) => write!(f, "Store query failed: {}", err),
            Self::Unexpected(Some(message)) => write!(f, "Handler panicked: {}", message),
            Self::Unexpected(None) => write!(f, "Handler panicked"),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Misconfigured(err) | Self::StoreQuery(err) => Some(err),
            Self::Unauthorized | Self::Unexpected(_) => None,
        }
    }
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Unauthorized => tracing::debug!("List request rejected: {}", self),
            Self::Misconfigured(err) | Self::StoreQuery(err) => tracing::error!(
                operation = %err.operation,
                kind = %err.kind,
                collection = ?err.collection,
                retriable = err.is_retriable(),
                "List error: {}", err.message
            ),
            Self::Unexpected(_) => tracing::error!("List error: {}", self),
        }

        (status, Json(ErrorEnvelope::new(self.client_message()))).into_response()
    }
}

//! Store error types
//!
//! Structured errors for store operations. The list handler never shows these
//! to clients; they are logged with full context and translated into a
//! redacted envelope.
//!
//! # Example
//!
//! ```rust
//! use listing_service::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::unknown_collection("orders");
//! assert_eq!(error.kind, StoreErrorKind::UnknownCollection);
//! assert_eq!(error.operation, StoreOperation::Query);
//! assert_eq!(error.collection.as_deref(), Some("orders"));
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Building a handle for a collection
    Open,
    /// Fetching a slice of records
    Query,
    /// Decoding the backend response
    Decode,
    /// Loading seed data into an in-memory store
    Seed,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Query => write!(f, "query"),
            Self::Decode => write!(f, "decode"),
            Self::Seed => write!(f, "seed"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Required backend configuration is absent
    Misconfigured,
    /// Collection identifier is malformed
    InvalidCollection,
    /// Collection does not exist in the backing store
    UnknownCollection,
    /// Backend could not be reached
    ConnectionFailed,
    /// Backend did not answer in time
    Timeout,
    /// Backend rejected or failed the query
    QueryFailed,
    /// Backend answered with rows that could not be decoded
    DecodeFailed,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misconfigured => write!(f, "misconfigured"),
            Self::InvalidCollection => write!(f, "invalid_collection"),
            Self::UnknownCollection => write!(f, "unknown_collection"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::DecodeFailed => write!(f, "decode_failed"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Detail for logs; never sent to clients
    pub message: String,
    /// The collection involved, when known
    pub collection: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            collection: None,
        }
    }

    /// Required backend configuration is missing
    ///
    /// # Example
    ///
    /// ```rust
    /// use listing_service::store::{StoreError, StoreErrorKind};
    ///
    /// let error = StoreError::misconfigured("backend URL is not configured");
    /// assert_eq!(error.kind, StoreErrorKind::Misconfigured);
    /// ```
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::new(StoreOperation::Open, StoreErrorKind::Misconfigured, message)
    }

    /// Collection identifier failed validation
    pub fn invalid_collection(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            StoreOperation::Query,
            StoreErrorKind::InvalidCollection,
            format!("malformed collection name {:?}", name),
        )
        .with_collection(name)
    }

    /// Collection is not present in the store
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            StoreOperation::Query,
            StoreErrorKind::UnknownCollection,
            "collection does not exist",
        )
        .with_collection(name)
    }

    /// Backend could not be reached
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(StoreOperation::Query, StoreErrorKind::ConnectionFailed, message)
    }

    /// Backend timed out
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StoreOperation::Query, StoreErrorKind::Timeout, message)
    }

    /// Backend failed the query
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::new(StoreOperation::Query, StoreErrorKind::QueryFailed, message)
    }

    /// Rows could not be decoded
    pub fn decode_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::DecodeFailed, message)
    }

    /// Attach the collection name
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Transient errors that may succeed if the caller retries
    ///
    /// The list handler does not retry; this is surfaced in logs only.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref collection) = self.collection {
            write!(f, " [collection: {}]", collection)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

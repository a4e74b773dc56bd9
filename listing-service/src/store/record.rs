//! Records, query ranges and collection names
//!
//! # Example
//!
//! ```rust
//! use listing_service::store::{OrderDirection, RecordRange};
//!
//! let range = RecordRange::new(50, 99);
//! assert_eq!(range.len(), 50);
//! assert_eq!(range.direction, OrderDirection::Descending);
//! ```

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::StoreError;

/// Column every record is ordered by
pub const CREATED_AT: &str = "created_at";

/// Identifier pattern accepted by both stores
static COLLECTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("collection name pattern is valid")
});

/// Check a collection identifier without building a handle
///
/// # Example
///
/// ```rust
/// use listing_service::store::is_valid_collection_name;
///
/// assert!(is_valid_collection_name("prepaid_orders"));
/// assert!(!is_valid_collection_name("orders?select=*"));
/// assert!(!is_valid_collection_name(""));
/// ```
pub fn is_valid_collection_name(name: &str) -> bool {
    COLLECTION_NAME.is_match(name)
}

/// Fail with `InvalidCollection` for malformed identifiers
pub fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    if is_valid_collection_name(name) {
        Ok(())
    } else {
        Err(StoreError::invalid_collection(name))
    }
}

/// A row from any collection
///
/// Only the creation timestamp is interpreted; every other column is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Creation time, the default ordering key
    pub created_at: DateTime<Utc>,
    /// Remaining columns
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no extra columns
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            fields: Map::new(),
        }
    }

    /// Add a column
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a column by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Direction for ordering by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Oldest first
    Ascending,
    /// Newest first
    #[default]
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Slice of a collection to fetch, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRange {
    /// Number of records to skip
    pub offset: u64,
    /// Position of the last record to return
    pub end_inclusive: u64,
    /// Ordering applied before slicing
    pub direction: OrderDirection,
}

impl RecordRange {
    /// Range ordered newest first
    #[must_use]
    pub const fn new(offset: u64, end_inclusive: u64) -> Self {
        Self {
            offset,
            end_inclusive,
            direction: OrderDirection::Descending,
        }
    }

    /// Override the ordering direction
    #[must_use]
    pub const fn with_direction(mut self, direction: OrderDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Number of positions covered; zero when the end precedes the offset
    #[must_use]
    pub const fn len(&self) -> u64 {
        if self.end_inclusive < self.offset {
            0
        } else {
            self.end_inclusive - self.offset + 1
        }
    }

    /// True when the range covers no positions
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a store hands back for one query
///
/// Both fields may be absent when a backend omits them; the list handler
/// substitutes an empty sequence and a zero count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePage {
    /// The requested slice, in order
    pub records: Option<Vec<Record>>,
    /// Count of every record in the collection, independent of the slice
    pub exact_count: Option<u64>,
}

impl StorePage {
    /// A page with both fields present
    pub fn new(records: Vec<Record>, exact_count: u64) -> Self {
        Self {
            records: Some(records),
            exact_count: Some(exact_count),
        }
    }
}

//! In-memory store
//!
//! Named collections held behind a shared read/write lock. Records keep their
//! insertion order; queries sort by `created_at` with a stable sort, so records
//! with equal timestamps come back in the order they were inserted, in either
//! direction.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use listing_service::store::{CollectionStore, MemoryStore, Record, RecordRange, StoreProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! store.insert("orders", Record::new(Utc::now()).with_field("id", 1)).await;
//!
//! let orders = store.collection("orders").unwrap();
//! let page = orders.query(RecordRange::new(0, 19)).await.unwrap();
//! assert_eq!(page.exact_count, Some(1));
//! # }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{StoreError, StoreOperation};
use super::record::{validate_collection_name, OrderDirection, Record, RecordRange, StorePage};
use super::traits::{CollectionStore, StoreProvider, StoreResult};
use crate::error::Result;

type Collections = Arc<RwLock<HashMap<String, Vec<Record>>>>;

/// Collections of records kept in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from prepared collections
    pub fn from_collections(collections: HashMap<String, Vec<Record>>) -> Self {
        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Load collections from a JSON document of the form
    /// `{"orders": [{"created_at": "...", ...}, ...], ...}`
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let collections: HashMap<String, Vec<Record>> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::decode_failed(StoreOperation::Seed, e.to_string()))?;

        for name in collections.keys() {
            if let Err(e) = validate_collection_name(name) {
                return Err(StoreError {
                    operation: StoreOperation::Seed,
                    ..e
                }
                .into());
            }
        }

        tracing::info!(
            path = %path.display(),
            collections = collections.len(),
            records = collections.values().map(Vec::len).sum::<usize>(),
            "Seeded in-memory store"
        );

        Ok(Self::from_collections(collections))
    }

    /// Register an empty collection; existing records are kept
    pub async fn create_collection(&self, name: impl Into<String>) {
        self.collections
            .write()
            .await
            .entry(name.into())
            .or_default();
    }

    /// Append a record, creating the collection if needed
    pub async fn insert(&self, collection: impl Into<String>, record: Record) {
        self.collections
            .write()
            .await
            .entry(collection.into())
            .or_default()
            .push(record);
    }

    /// Append many records in order
    pub async fn extend(
        &self,
        collection: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) {
        self.collections
            .write()
            .await
            .entry(collection.into())
            .or_default()
            .extend(records);
    }
}

impl StoreProvider for MemoryStore {
    type Collection = MemoryCollection;

    fn collection(&self, name: &str) -> StoreResult<MemoryCollection> {
        Ok(MemoryCollection {
            name: name.to_string(),
            collections: Arc::clone(&self.collections),
        })
    }
}

/// Handle onto one collection of a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    name: String,
    collections: Collections,
}

impl CollectionStore for MemoryCollection {
    async fn query(&self, range: RecordRange) -> StoreResult<StorePage> {
        validate_collection_name(&self.name)?;

        let collections = self.collections.read().await;
        let rows = collections
            .get(&self.name)
            .ok_or_else(|| StoreError::unknown_collection(&self.name))?;

        let mut ordered: Vec<&Record> = rows.iter().collect();
        match range.direction {
            OrderDirection::Descending => ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            OrderDirection::Ascending => ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        let skip = usize::try_from(range.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(range.len()).unwrap_or(usize::MAX);
        let records: Vec<Record> = ordered.into_iter().skip(skip).take(take).cloned().collect();

        tracing::debug!(
            collection = %self.name,
            offset = range.offset,
            end = range.end_inclusive,
            returned = records.len(),
            total = rows.len(),
            "Queried in-memory collection"
        );

        Ok(StorePage::new(records, rows.len() as u64))
    }
}

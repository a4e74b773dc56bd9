//! Store adapters for record collections
//!
//! This module provides the store abstraction the list handler reads through,
//! plus two implementations:
//!
//! - [`MemoryStore`]: named collections held in process memory, optionally
//!   seeded from a JSON file
//! - [`RestBackend`]: a PostgREST-compatible HTTP backend (`rest` feature)
//!
//! Every store orders by `created_at` and reports an exact count that does not
//! depend on the requested slice.

mod error;
mod memory;
mod record;
#[cfg(feature = "rest")]
mod rest;
mod traits;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::{MemoryCollection, MemoryStore};
pub use record::{
    is_valid_collection_name, validate_collection_name, OrderDirection, Record, RecordRange,
    StorePage, CREATED_AT,
};
#[cfg(feature = "rest")]
pub use rest::{parse_content_range, RestBackend, RestCollection};
pub use traits::{CollectionStore, StoreProvider, StoreResult};

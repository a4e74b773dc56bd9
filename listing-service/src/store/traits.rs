//! Store trait definitions
//!
//! Stores are injected into the application state as a generic parameter, so
//! every handler is testable against an in-memory store and no process-wide
//! singleton exists.
//!
//! Both traits use RPITIT (Return Position Impl Trait In Traits), so async
//! methods need no `async_trait` boxing.
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_service::store::{CollectionStore, RecordRange, StoreProvider};
//!
//! let orders = provider.collection("orders")?;
//! let page = orders.query(RecordRange::new(0, 19)).await?;
//! println!("{} orders in total", page.exact_count.unwrap_or_default());
//! ```

use std::future::Future;

use super::error::StoreError;
use super::record::{RecordRange, StorePage};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Source of collection handles
///
/// Building a handle is where configuration problems surface: a provider
/// that lacks its backend endpoint or credentials fails here with
/// `StoreErrorKind::Misconfigured`, before any query runs.
pub trait StoreProvider: Send + Sync + 'static {
    /// Handle type for one collection
    type Collection: CollectionStore;

    /// Build a handle for the named collection
    ///
    /// The name is not validated here; malformed names fail at query time.
    fn collection(&self, name: &str) -> StoreResult<Self::Collection>;

    /// Whether handles can be built at all
    ///
    /// Used by the readiness check.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Read access to one collection
pub trait CollectionStore: Send + Sync {
    /// Fetch the ordered slice described by `range` together with the exact
    /// count of every record in the collection
    ///
    /// An empty collection, or a range past the end, is a success with no
    /// records.
    fn query(&self, range: RecordRange) -> impl Future<Output = StoreResult<StorePage>> + Send;
}

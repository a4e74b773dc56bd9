//! # listing-service
//!
//! Authenticated, paginated list endpoints over named record collections.
//!
//! Each configured route serves one collection through the same handler:
//! a cookie-presence access guard, `page` / `pageSize` normalization, one
//! store query returning the slice plus an exact count, and a fixed JSON
//! envelope for success and every failure.
//!
//! ## Features
//!
//! - **One handler, many collections**: routes come from configuration
//! - **Pluggable stores**: in-memory (optionally seeded from JSON) or a
//!   PostgREST-compatible HTTP backend (`rest` feature)
//! - **Middleware stack**: request IDs, sensitive header masking, panic
//!   recovery, body size limits, compression, CORS
//! - **Health checks**: liveness and readiness endpoints
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use listing_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = MemoryStore::new();
//!     store.create_collection("orders").await;
//!
//!     run(config, store).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod listing;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AuthConfig, BackendConfig, BackendKind, Config, RouteConfig};
    pub use crate::error::{Error, Result};
    pub use crate::health::{health, readiness};
    pub use crate::listing::{
        list_collection, list_endpoint, router, ListError, ListResult, PageWindow, RawListParams,
        RequestContext, SessionCarriers,
    };
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        SENSITIVE_HEADERS,
    };
    pub use crate::observability::init_tracing;
    pub use crate::server::{run, Server};
    pub use crate::state::AppState;
    pub use crate::store::{
        CollectionStore, MemoryStore, Record, RecordRange, StoreError, StoreErrorKind,
        StorePage, StoreProvider,
    };

    #[cfg(feature = "rest")]
    pub use crate::store::RestBackend;

    pub use axum::{routing::get, Router};
}

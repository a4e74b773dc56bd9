//! Paginated, access-guarded list endpoints over record collections
//!
//! This module provides:
//! - [`SessionCarriers`]: the cookie-presence access guard
//! - [`PageWindow`]: normalization of `page` / `pageSize` into a bounded range
//! - [`RequestContext`]: the query parameters and cookies a list request carries
//! - [`list_endpoint`]: the single handler shared by every collection
//! - [`router`]: the route table built from configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use listing_service::listing::{list_collection, RawListParams, RequestContext};
//!
//! let context = RequestContext::new(RawListParams::new("2", "50"))
//!     .with_cookie("session_token", token);
//! let page = list_collection(&state, "orders", &context).await?;
//! assert_eq!(page.page_size, 50);
//! ```

mod context;
mod error;
mod guard;
mod handler;
mod pagination;
mod response;
mod routes;

pub use context::RequestContext;
pub use error::{ListError, INTERNAL_ERROR_MESSAGE, LIST_FAILED_MESSAGE, UNAUTHORIZED_MESSAGE};
pub use guard::SessionCarriers;
pub use handler::{list_collection, list_endpoint};
pub use pagination::{PageWindow, RawListParams, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{ErrorEnvelope, ListResult};
pub use routes::{router, HEALTH_PATH, READY_PATH};

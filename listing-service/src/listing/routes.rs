//! Route table
//!
//! Every `[[routes]]` entry in the configuration becomes a `GET` route bound
//! to the one list handler with its collection name. Adding a listed resource
//! is a configuration change, not a code change.
//!
//! # Example
//!
//! ```rust
//! use listing_service::{config::Config, listing::router, state::AppState, store::MemoryStore};
//!
//! let state = AppState::new(Config::default(), MemoryStore::new());
//! let app: axum::Router = router(state);
//! ```

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use super::{context::RequestContext, handler::list_endpoint};
use crate::{
    config::RouteConfig,
    health::{health, readiness},
    state::AppState,
    store::{is_valid_collection_name, StoreProvider},
};

/// Path of the liveness check
pub const HEALTH_PATH: &str = "/health";

/// Path of the readiness check
pub const READY_PATH: &str = "/ready";

/// Build the router for health checks and every configured list route
///
/// Entries whose path axum cannot register (no leading `/`, `:name` or
/// `*name` segments, a path already taken, a conflicting capture) are
/// skipped with a warning. A malformed collection name is only
/// warned about; requests to that route fail as store errors.
pub fn router<P>(state: AppState<P>) -> Router
where
    P: StoreProvider,
{
    let mut router = Router::new()
        .route(HEALTH_PATH, get(health::<P>))
        .route(READY_PATH, get(readiness::<P>));

    for route in usable_routes(&state.config().routes) {
        if !is_valid_collection_name(&route.collection) {
            tracing::warn!(
                path = %route.path,
                collection = %route.collection,
                "Route points at a malformed collection name; requests will fail"
            );
        }

        tracing::debug!(path = %route.path, collection = %route.collection, "Registering list route");

        let collection: Arc<str> = Arc::from(route.collection.as_str());
        router = router.route(
            &route.path,
            get(
                move |State(state): State<AppState<P>>, context: RequestContext| {
                    let collection = Arc::clone(&collection);
                    async move { list_endpoint(state, &collection, context).await }
                },
            ),
        );
    }

    router.with_state(state)
}

/// Routes that can be registered, in configuration order
///
/// Each accepted path is also added to a scratch router, so anything axum
/// would refuse (capture conflicts, overlapping wildcards) is found here and
/// skipped instead of panicking the real router.
fn usable_routes(routes: &[RouteConfig]) -> Vec<&RouteConfig> {
    let mut taken: HashSet<&str> = HashSet::from([HEALTH_PATH, READY_PATH]);
    let mut scratch: Router = Router::new()
        .route(HEALTH_PATH, get(|| async {}))
        .route(READY_PATH, get(|| async {}));

    routes
        .iter()
        .filter(|route| {
            let route: &RouteConfig = *route;
            let path = route.path.as_str();
            if !path.starts_with('/') {
                tracing::warn!(path, "Skipping route: path must start with '/'");
                return false;
            }
            if path
                .split('/')
                .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
            {
                tracing::warn!(path, "Skipping route: use `{{name}}` captures, not `:name` or `*name`");
                return false;
            }
            if taken.contains(path) {
                tracing::warn!(path, "Skipping route: path already registered");
                return false;
            }

            let candidate = scratch.clone();
            match panic::catch_unwind(AssertUnwindSafe(|| candidate.route(path, get(|| async {})))) {
                Ok(extended) => {
                    scratch = extended;
                    taken.insert(path);
                    true
                }
                Err(payload) => {
                    let reason = payload
                        .downcast_ref::<String>()
                        .map(String::as_str)
                        .or_else(|| payload.downcast_ref::<&str>().copied())
                        .unwrap_or("rejected by router");
                    tracing::warn!(path, reason, "Skipping route: path cannot be registered");
                    false
                }
            }
        })
        .collect()
}

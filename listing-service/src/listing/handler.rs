//! The list endpoint handler
//!
//! One handler serves every configured collection. Each request walks the same
//! linear path, with no retries:
//!
//! 1. Access guard: no session carrier gives `401`
//! 2. Collection handle: a store that cannot build one gives `500 Internal error`
//! 3. Page window: always succeeds
//! 4. Store query: failure gives `500 List failed`
//! 5. Envelope: `200 {items, total, page, pageSize}`
//!
//! A panic anywhere along the way is caught at [`list_endpoint`] and turned
//! into a `500` envelope.

use std::panic::AssertUnwindSafe;

use axum::response::{IntoResponse, Response};
use futures::FutureExt;

use super::{
    context::RequestContext, error::ListError, guard::SessionCarriers, response::ListResult,
};
use crate::{
    state::AppState,
    store::{CollectionStore, Record, StoreProvider},
};

/// List one page of `collection`
///
/// Absent records or an absent count from the store read as an empty page and
/// a total of zero.
pub async fn list_collection<P>(
    state: &AppState<P>,
    collection: &str,
    context: &RequestContext,
) -> Result<ListResult<Record>, ListError>
where
    P: StoreProvider,
{
    let carriers = SessionCarriers::from_cookies(context.cookies(), &state.config().auth);
    if !carriers.is_authorized() {
        return Err(ListError::Unauthorized);
    }

    let handle = state
        .store()
        .collection(collection)
        .map_err(|e| ListError::Misconfigured(e.with_collection(collection)))?;

    let window = context.query_params().window();

    let page = handle
        .query(window.range())
        .await
        .map_err(|e| ListError::StoreQuery(e.with_collection(collection)))?;

    let items = page.records.unwrap_or_default();
    let total = page.exact_count.unwrap_or_default();

    tracing::debug!(
        collection,
        page = window.page,
        page_size = window.page_size,
        returned = items.len(),
        total,
        "Listed collection"
    );

    Ok(ListResult::new(items, total, window))
}

/// Serve a list request, converting every outcome into a response
///
/// This is the only place list failures leave the handler; nothing propagates
/// to the transport layer.
pub async fn list_endpoint<P>(
    state: AppState<P>,
    collection: &str,
    context: RequestContext,
) -> Response
where
    P: StoreProvider,
{
    let outcome = AssertUnwindSafe(list_collection(&state, collection, &context))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(result)) => result.into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(payload) => ListError::from_panic(payload).into_response(),
    }
}

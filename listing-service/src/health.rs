//! Health check handlers
//!
//! Both checks sit outside the access guard.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{state::AppState, store::StoreProvider};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness)
///
/// Always returns 200 OK if the service is running.
pub async fn health<P>(State(state): State<AppState<P>>) -> impl IntoResponse
where
    P: StoreProvider,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness)
///
/// Returns 503 Service Unavailable while the store cannot hand out collection
/// handles, i.e. while its endpoint or key is missing. No query is issued.
pub async fn readiness<P>(State(state): State<AppState<P>>) -> impl IntoResponse
where
    P: StoreProvider,
{
    let configured = state.store().is_configured();

    if !configured {
        tracing::warn!(
            backend = %state.config().backend.kind,
            "Readiness check failed: store is not configured"
        );
    }

    let mut dependencies = HashMap::new();
    dependencies.insert(
        "store".to_string(),
        DependencyStatus {
            healthy: configured,
            message: Some(if configured {
                format!("{} backend configured", state.config().backend.kind)
            } else {
                "Backend endpoint or key missing".to_string()
            }),
        },
    );

    let response = ReadinessResponse {
        ready: configured,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if configured {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

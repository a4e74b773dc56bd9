//! HTTP server with graceful shutdown

use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    response::{IntoResponse, Response},
    Json, Router,
};
use http::StatusCode;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    listing::{router, ErrorEnvelope, INTERNAL_ERROR_MESSAGE},
    middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        sensitive_response_headers_layer,
    },
    state::AppState,
    store::StoreProvider,
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap `app` in the middleware stack
    ///
    /// Each layer wraps everything added before it, so the request ID is set
    /// before tracing sees the request.
    pub fn layered(&self, app: Router) -> Router {
        let body_limit = self
            .config
            .middleware
            .body_limit_mb
            .saturating_mul(1024 * 1024);

        app
            .layer(self.build_cors_layer())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.service.timeout_secs),
            ))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_response_headers_layer())
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
            // Last resort for panics outside the list handler
            .layer(CatchPanicLayer::custom(panic_response))
    }

    /// Run the server with the given router
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);

        self.log_middleware_config();

        let app = self.layered(app);

        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: enabled");
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
        tracing::info!(
            "  - Request body limit: {} MB",
            self.config.middleware.body_limit_mb
        );
        tracing::info!("  - Compression: enabled");
        tracing::info!("  - CORS mode: {}", self.config.middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!(
            "  - List routes: {}, backend: {}",
            self.config.routes.len(),
            self.config.backend.kind
        );
    }

    fn build_cors_layer(&self) -> CorsLayer {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                CorsLayer::permissive()
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                CorsLayer::new()
            }
            "disabled" => {
                tracing::debug!("CORS disabled (using restrictive)");
                CorsLayer::new()
            }
            _ => {
                tracing::warn!(
                    "Unknown CORS mode: {}, defaulting to permissive",
                    self.config.middleware.cors_mode
                );
                CorsLayer::permissive()
            }
        }
    }
}

/// JSON envelope for a panic that escaped every handler
fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request panicked outside the list handler");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

/// Build the router for `store` and serve it until a shutdown signal
pub async fn run<P>(config: Config, store: P) -> Result<()>
where
    P: StoreProvider,
{
    let state = AppState::new(config.clone(), store);
    Server::new(config).serve(router(state)).await
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Record};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    #[tokio::test]
    async fn test_layered_router_serves_list_with_request_id() {
        let store = MemoryStore::new();
        store.insert("orders", Record::new(Utc::now()).with_field("id", 1)).await;

        let config = Config::default();
        let server = Server::new(config.clone());
        let app = server.layered(router(AppState::new(config, store)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/orders?pageSize=5")
                    .header(header::COOKIE, "session_token=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["pageSize"], 5);
    }

    async fn explode() -> StatusCode {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_escaped_panic_is_json_envelope() {
        let server = Server::new(Config::default());
        let app = server.layered(Router::new().route("/explode", axum::routing::get(explode)));

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Internal error"}));
    }

    #[tokio::test]
    async fn test_huge_body_limit_does_not_overflow() {
        let mut config = Config::default();
        config.middleware.body_limit_mb = usize::MAX;
        let server = Server::new(config.clone());
        let app = server.layered(router(AppState::new(config, MemoryStore::new())));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_cors_mode_still_builds() {
        let mut config = Config::default();
        config.middleware.cors_mode = "sideways".to_string();
        let server = Server::new(config.clone());
        let app = server.layered(router(AppState::new(config, MemoryStore::new())));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

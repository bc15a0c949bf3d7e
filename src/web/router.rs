//! Router configuration for the relay.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::ws::{chat_ws_handler, ChatRelay};

/// Create the main router: WebSocket endpoint, health check and, when
/// enabled, the public directory as fallback.
pub fn create_router(relay: Arc<ChatRelay>, config: &WebConfig) -> Router {
    let mut router = create_ws_router(relay).merge(create_health_router());

    if config.serve_static {
        router = router.fallback_service(ServeDir::new(&config.public_path));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.cors_origins)),
    )
}

/// Create the WebSocket router.
pub fn create_ws_router(relay: Arc<ChatRelay>) -> Router {
    Router::new()
        .route("/ws", get(chat_ws_handler))
        .with_state(relay)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a CORS layer. Without configured origins any origin is allowed.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

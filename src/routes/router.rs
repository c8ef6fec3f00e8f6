use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::api;
use super::health;
use super::pages;
use super::AppState;

/// Create application router
pub fn create_router(state: Arc<AppState>, allowed_origins: Vec<String>) -> axum::Router {
    // Configure CORS with specific origins
    let cors = if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Specific paths win over the catch-all /{short_id} segment, so /health
    // and /api/* stay reachable regardless of registration order.
    axum::Router::new()
        .route("/", get(pages::home))
        .route("/shorten", post(pages::shorten))
        .route("/health", get(health::health_check))
        .route("/api/stats/{short_id}", get(api::stats))
        .route("/api/urls", get(api::list_urls))
        .route("/{short_id}", get(pages::redirect))
        .fallback(pages::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

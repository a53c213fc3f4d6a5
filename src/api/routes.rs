//! API Routes
//!
//! Configures the Axum router: administrative endpoints plus static assets.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::assets::asset_handler;
use super::handlers::{clear_handler, evict_handler, health_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/cache/stats` - Entry count and cached size
/// - `POST /api/cache/clear` - Drop every cached entry
/// - `DELETE /api/cache/entry?path=...` - Drop one cached entry
/// - `GET /health` - Health check endpoint
/// - Anything else - Static assets from the serving root
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/clear", post(clear_handler))
        .route("/api/cache/entry", delete(evict_handler))
        .route("/health", get(health_handler))
        .fallback(asset_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

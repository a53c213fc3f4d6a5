//! API Module
//!
//! HTTP handlers and routing for the asset cache server.
//!
//! # Endpoints
//! - `GET /api/cache/stats` - Cache statistics
//! - `POST /api/cache/clear` - Clear the cache
//! - `DELETE /api/cache/entry?path=...` - Evict one entry
//! - `GET /health` - Health check endpoint
//! - anything else - Static assets, served cache-first

pub mod assets;
pub mod handlers;
pub mod routes;

pub use assets::{asset_handler, render_asset, validator_matches, Asset, CacheStatus};
pub use handlers::*;
pub use routes::create_router;

//! Asset Cache - an in-process cache for static file serving
//!
//! Keeps recently served file bodies in memory with their ETag and
//! modification time, evicting by TTL and by a total size budget.

pub mod api;
pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;

//! Request DTOs for the administrative API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

/// Query for the single-entry eviction operation (DELETE /api/cache/entry)
///
/// # Fields
/// - `path`: Request path whose cached entry should be dropped, e.g. `/app.js`
#[derive(Debug, Clone, Deserialize)]
pub struct EvictRequest {
    /// Request path, mapped to a cache key the same way asset requests are
    pub path: String,
}

impl EvictRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.path.is_empty() {
            return Some("Path cannot be empty".to_string());
        }
        None
    }
}

//! Static Asset Handler
//!
//! Cache-first file serving with conditional GET support.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::handlers::AppState;
use crate::assets::content_type_for;
use crate::cache::{generate_validator, CacheEntry};
use crate::error::Result;

const X_CACHE: &str = "x-cache";

/// Where a response body came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Everything needed to render one asset response.
///
/// Holds a shared view of the body, so rendering never copies file data.
#[derive(Debug, Clone)]
pub struct Asset {
    pub key: String,
    pub data: Bytes,
    pub validator: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<&CacheEntry> for Asset {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key().to_string(),
            data: entry.data().clone(),
            validator: entry.validator().map(str::to_string),
            modified: entry.source_mod_time(),
        }
    }
}

/// Handler for every path outside the administrative API.
///
/// Serves fresh cache entries directly. On a miss or an expired entry the
/// file is read without holding the cache lock, inserted, and served; if the
/// insertion fails the freshly read bytes are served uncached.
pub async fn asset_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response> {
    let key = state.files.key_for(uri.path())?;
    let if_none_match = headers.get(header::IF_NONE_MATCH);
    let max_age = state.ttl.as_secs();

    if let Some(asset) = lookup_fresh(&state, &key).await {
        debug!(key = %key, "Serving from cache");
        return Ok(render_asset(&asset, if_none_match, max_age, CacheStatus::Hit));
    }

    debug!(key = %key, "Loading from disk");
    let file = state.files.read(&key).await?;
    let validator = generate_validator(&key, file.modified);

    {
        let mut cache = state.cache.write().await;
        match cache.add(&key, &file.data, Some(validator.clone()), file.modified) {
            Ok(()) => info!(key = %key, bytes = file.data.len(), "Cached file"),
            Err(e) => warn!(key = %key, error = %e, "Failed to cache file, serving directly"),
        }
    }

    let asset = Asset {
        key,
        data: Bytes::from(file.data),
        validator: Some(validator),
        modified: file.modified,
    };
    Ok(render_asset(&asset, if_none_match, max_age, CacheStatus::Miss))
}

/// Returns the cached asset for `key` if present and within TTL.
///
/// An expired entry is removed so the caller reloads it from disk.
async fn lookup_fresh(state: &AppState, key: &str) -> Option<Asset> {
    {
        let cache = state.cache.read().await;
        let entry = cache.get(key)?;
        if !entry.is_expired(cache.now_ms(), state.ttl) {
            return Some(Asset::from(entry));
        }
    }

    // Re-check under the write lock, another request may have refreshed it
    let mut cache = state.cache.write().await;
    let now = cache.now_ms();
    if let Some(entry) = cache.get(key) {
        if !entry.is_expired(now, state.ttl) {
            return Some(Asset::from(entry));
        }
    }
    if cache.remove(key).is_ok() {
        debug!(key, "Dropped expired cache entry");
    }
    None
}

/// Builds the HTTP response for an asset.
///
/// A matching `If-None-Match` yields `304 Not Modified` with no body.
pub fn render_asset(
    asset: &Asset,
    if_none_match: Option<&HeaderValue>,
    max_age_secs: u64,
    status: CacheStatus,
) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(tag) = asset
        .validator
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        headers.insert(header::ETAG, tag);
    }
    if let Ok(cache_control) = HeaderValue::from_str(&format!("public, max-age={}", max_age_secs)) {
        headers.insert(header::CACHE_CONTROL, cache_control);
    }
    headers.insert(X_CACHE, HeaderValue::from_static(status.as_str()));

    if let (Some(validator), Some(requested)) = (asset.validator.as_deref(), if_none_match) {
        if validator_matches(requested, validator) {
            return (StatusCode::NOT_MODIFIED, headers).into_response();
        }
    }

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&asset.key)),
    );
    if let Some(last_modified) = asset
        .modified
        .and_then(|t| HeaderValue::from_str(&http_date(t)).ok())
    {
        headers.insert(header::LAST_MODIFIED, last_modified);
    }
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    (StatusCode::OK, headers, Body::from(asset.data.clone())).into_response()
}

/// Checks an `If-None-Match` value against a stored validator.
///
/// Accepts a comma-separated list, weak (`W/`) tags and `*`.
pub fn validator_matches(requested: &HeaderValue, validator: &str) -> bool {
    let Ok(requested) = requested.to_str() else {
        return false;
    };

    let validator = validator.trim_start_matches("W/");
    requested
        .split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag.trim_start_matches("W/") == validator)
}

fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

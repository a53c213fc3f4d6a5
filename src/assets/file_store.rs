//! File Store Module
//!
//! Maps request paths onto the serving root and reads files from disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::warn;

use crate::error::{CacheError, Result};

/// Document served for `/` and any directory path
pub const INDEX_DOCUMENT: &str = "index.html";

// == File Data ==
/// Bytes and stat metadata of a file read from the serving root.
#[derive(Debug, Clone)]
pub struct FileData {
    pub data: Vec<u8>,
    pub modified: Option<DateTime<Utc>>,
}

// == File Store ==
/// Read access to the files under a serving root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: String,
}

impl FileStore {
    // == Constructor ==
    /// Creates a file store serving from `root`.
    ///
    /// A trailing slash on `root` is ignored and an empty root means `"."`.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let root = match root.trim_end_matches('/') {
            "" if root.starts_with('/') => String::new(),
            "" => ".".to_string(),
            trimmed => trimmed.to_string(),
        };
        Self { root }
    }

    pub fn root(&self) -> &str {
        if self.root.is_empty() {
            "/"
        } else {
            &self.root
        }
    }

    // == Key For ==
    /// Maps a request path to its cache key.
    ///
    /// The path is percent-decoded, checked for traversal, stripped of repeated
    /// slashes, defaulted to the index document when it names a directory, and
    /// prefixed with the root:
    /// `"/"` becomes `"./index.html"` for root `"."`.
    ///
    /// # Errors
    /// `InvalidPath` if the path is not absolute, cannot be decoded, or would
    /// escape the serving root.
    pub fn key_for(&self, request_path: &str) -> Result<String> {
        let decoded = urlencoding::decode(request_path)
            .map_err(|_| CacheError::InvalidPath(request_path.to_string()))?;

        if !is_sane(&decoded) {
            return Err(CacheError::InvalidPath(request_path.to_string()));
        }

        let mut key = self.root.clone();
        for c in decoded.chars() {
            if c == '/' && key.ends_with('/') {
                continue;
            }
            key.push(c);
        }
        if key.ends_with('/') {
            key.push_str(INDEX_DOCUMENT);
        }
        Ok(key)
    }

    // == Read ==
    /// Reads a file and its modification time.
    ///
    /// # Errors
    /// - `NotFound` if nothing readable exists at `key` or it is not a file
    /// - `Internal` for any other I/O failure
    pub async fn read(&self, key: &str) -> Result<FileData> {
        let path = PathBuf::from(key);

        let metadata = fs::metadata(&path).await.map_err(|e| io_error(key, e))?;
        if !metadata.is_file() {
            return Err(CacheError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| io_error(key, e))?;
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        Ok(FileData { data, modified })
    }
}

/// Accepts only absolute paths without `..` segments, backslashes or NULs.
fn is_sane(path: &str) -> bool {
    path.starts_with('/')
        && !path.contains('\\')
        && !path.contains('\0')
        && !path.split('/').any(|segment| segment == "..")
}

fn io_error(key: &str, error: std::io::Error) -> CacheError {
    match error.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => CacheError::NotFound(key.to_string()),
        _ => {
            warn!(key, error = %error, "Failed to read file");
            CacheError::Internal(format!("Failed to read {}", key))
        }
    }
}

//! Configuration Module
//!
//! Handles loading server configuration from environment variables. Values are
//! read once at startup and never change afterwards.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::BYTES_PER_MB;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum age of a cached entry in milliseconds
    pub ttl_ms: u64,
    /// Ceiling on the total size of cached data, in megabytes
    pub max_size_mb: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Interval between TTL sweeps in seconds
    pub sweep_interval: u64,
    /// Directory files are served from
    pub serve_root: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry time-to-live in milliseconds (default: 300000)
    /// - `CACHE_MAX_SIZE_MB` - Total cache size ceiling in MB (default: 100)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `SWEEP_INTERVAL` - TTL sweep frequency in seconds (default: 60)
    /// - `SERVE_ROOT` - Directory to serve files from (default: ".")
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            max_size_mb: env_or("CACHE_MAX_SIZE_MB", defaults.max_size_mb),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            serve_root: env::var("SERVE_ROOT").unwrap_or(defaults.serve_root),
        }
    }

    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Size ceiling in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: 300_000,
            max_size_mb: 100,
            server_port: 8000,
            sweep_interval: 60,
            serve_root: ".".to_string(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

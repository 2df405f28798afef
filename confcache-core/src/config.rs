//! Configuration for the caching provider.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the partitioned TTL cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied to every entry at write time. No per-key override.
    pub cache_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_timeout: Duration::from_millis(20_000),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    /// Set the entry TTL in milliseconds.
    pub fn with_cache_timeout_ms(mut self, millis: u64) -> Self {
        self.cache_timeout = Duration::from_millis(millis);
        self
    }
}

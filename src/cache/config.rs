//! Sizing and expiry settings for memory-bounded caches.

use std::time::Duration;

/// Configuration for a [`BoundedCache`](super::BoundedCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// After this duration, entries are automatically evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set max capacity for cache (builder pattern).
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Disable TTL (entries never expire based on time).
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Frequently read data: higher capacity, short TTL, idle timeout.
    pub fn hot_data() -> Self {
        Self {
            max_capacity: 50_000,
            ttl: Some(Duration::from_secs(60)),
            tti: Some(Duration::from_secs(30)),
        }
    }

    /// Session-like data: expires when idle, capped by a hard TTL.
    pub fn session_data() -> Self {
        Self {
            max_capacity: 20_000,
            ttl: Some(Duration::from_secs(1800)), // 30 minutes max
            tti: Some(Duration::from_secs(300)),  // 5 minutes idle
        }
    }
}

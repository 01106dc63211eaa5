//! Capability traits every cache behind the registry implements.

use std::collections::HashSet;
use std::fmt;

use crate::error::{CacheAccessError, ReleaseError};

/// Key/value operations on a single named cache.
///
/// The registry never calls these itself; they are what callers get back
/// once they recover a typed view from a [`CacheHandle`](super::CacheHandle).
pub trait Cache<K, V>: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &K) -> Result<Option<V>, CacheAccessError>;

    /// Stores `value` under `key`, returning the value it replaced.
    fn put(&self, key: K, value: V) -> Result<Option<V>, CacheAccessError>;

    /// Removes the entry for `key`, returning its value.
    fn remove(&self, key: &K) -> Result<Option<V>, CacheAccessError>;

    /// Removes every entry.
    fn clear(&self) -> Result<(), CacheAccessError>;

    /// Number of entries currently stored.
    fn size(&self) -> usize;

    /// Snapshot of all keys.
    fn keys(&self) -> HashSet<K>;

    /// Snapshot of all values. The same value may appear more than once.
    fn values(&self) -> Vec<V>;
}

/// The type-erased side of a cache that the registry keeps track of.
pub trait ManagedCache: fmt::Display + Send + Sync + 'static {
    /// Name the cache was created under.
    fn name(&self) -> &str;

    /// Cleanup hook run once during registry shutdown.
    ///
    /// Caches that hold nothing worth releasing keep the default.
    fn release_hook(&self) -> Option<&dyn Release> {
        None
    }
}

/// Releases resources held by a cache.
pub trait Release {
    fn release(&self) -> Result<(), ReleaseError>;
}

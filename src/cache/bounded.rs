//! Memory-bounded cache backed by Moka.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use moka::sync::Cache as MokaCache;
use tracing::debug;

use super::{Cache, CacheConfig, CacheHandle, ManagedCache, Release};
use crate::error::{CacheAccessError, ReleaseError};

/// A named cache that evicts once it reaches its configured capacity.
///
/// Entries may also expire through TTL/TTI. Releasing the cache drops every
/// entry it holds.
pub struct BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: MokaCache<K, V>,
    name: String,
    released: AtomicBool,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new bounded cache with the given name and config.
    pub fn new(name: impl Into<String>, config: &CacheConfig) -> Self {
        let name = name.into();
        let mut builder = MokaCache::builder()
            .name(&name)
            .max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: builder.build(),
            name,
            released: AtomicBool::new(false),
        }
    }

    /// Wrap this cache in a registry handle.
    pub fn into_handle(self) -> CacheHandle {
        CacheHandle::new::<K, V, Self>(self)
    }

    /// Whether the release hook has run.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl<K, V> Cache<K, V> for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>, CacheAccessError> {
        Ok(self.inner.get(key))
    }

    fn put(&self, key: K, value: V) -> Result<Option<V>, CacheAccessError> {
        // Moka has no swap; the previous value is best effort under contention.
        let previous = self.inner.get(&key);
        self.inner.insert(key, value);
        Ok(previous)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, CacheAccessError> {
        Ok(self.inner.remove(key))
    }

    fn clear(&self) -> Result<(), CacheAccessError> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn size(&self) -> usize {
        self.inner.run_pending_tasks();
        usize::try_from(self.inner.entry_count()).unwrap_or(usize::MAX)
    }

    fn keys(&self) -> HashSet<K> {
        self.inner.iter().map(|(key, _)| K::clone(&key)).collect()
    }

    fn values(&self) -> Vec<V> {
        self.inner.iter().map(|(_, value)| value).collect()
    }
}

impl<K, V> ManagedCache for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn release_hook(&self) -> Option<&dyn Release> {
        Some(self)
    }
}

impl<K, V> Release for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn release(&self) -> Result<(), ReleaseError> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
        debug!("Released bounded cache: {}", self.name);
        Ok(())
    }
}

impl<K, V> fmt::Display for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.size();
        let noun = if count == 1 { "entry" } else { "entries" };
        write!(f, "BoundedCache '{}' ({} {})", self.name, count, noun)
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> BoundedCache<String, u32> {
        BoundedCache::new("scores", &CacheConfig::with_capacity(100))
    }

    #[test]
    fn test_put_returns_previous_value() {
        let cache = make_cache();
        assert_eq!(cache.put("a".into(), 1).unwrap(), None);
        assert_eq!(cache.put("a".into(), 2).unwrap(), Some(1));
        assert_eq!(cache.get(&"a".into()).unwrap(), Some(2));
    }

    #[test]
    fn test_remove_and_size() {
        let cache = make_cache();
        cache.put("a".into(), 1).unwrap();
        cache.put("b".into(), 1).unwrap();
        assert_eq!(cache.size(), 2);

        assert_eq!(cache.remove(&"a".into()).unwrap(), Some(1));
        assert_eq!(cache.remove(&"a".into()).unwrap(), None);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_keys_and_values_snapshot() {
        let cache = make_cache();
        cache.put("a".into(), 7).unwrap();
        cache.put("b".into(), 7).unwrap();

        let keys = cache.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("a"));
        assert_eq!(cache.values(), vec![7, 7]);
    }

    #[test]
    fn test_release_drops_entries_once() {
        let cache = make_cache();
        cache.put("a".into(), 1).unwrap();

        cache.release().unwrap();
        assert!(cache.is_released());
        assert_eq!(cache.get(&"a".into()).unwrap(), None);
        assert!(cache.keys().is_empty());

        // Second release is a no-op.
        cache.release().unwrap();
    }

    #[test]
    fn test_display_reflects_pending_writes() {
        let cache = make_cache();
        cache.put("a".into(), 1).unwrap();
        assert_eq!(cache.to_string(), "BoundedCache 'scores' (1 entry)");

        cache.put("b".into(), 2).unwrap();
        assert_eq!(cache.to_string(), "BoundedCache 'scores' (2 entries)");
    }

    #[test]
    fn test_handle_recovers_typed_view() {
        let handle = make_cache().into_handle();
        assert_eq!(handle.name(), "scores");

        let typed = handle.typed::<String, u32>().unwrap();
        typed.put("x".into(), 3).unwrap();
        assert_eq!(typed.get(&"x".into()).unwrap(), Some(3));

        assert!(handle.typed::<String, String>().is_none());
        assert!(handle.to_string().starts_with("BoundedCache 'scores'"));
    }
}

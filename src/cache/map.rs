//! Unbounded cache over a concurrent hash map.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use dashmap::DashMap;

use super::{Cache, CacheHandle, ManagedCache};
use crate::error::CacheAccessError;

/// A named cache that keeps every entry until it is removed or cleared.
///
/// Holds no external resources, so it has no release hook.
pub struct MapCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    name: String,
    map: DashMap<K, V>,
}

impl<K, V> MapCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: DashMap::new(),
        }
    }

    /// Wrap this cache in a registry handle.
    pub fn into_handle(self) -> CacheHandle {
        CacheHandle::new::<K, V, Self>(self)
    }
}

impl<K, V> Cache<K, V> for MapCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>, CacheAccessError> {
        Ok(self.map.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: K, value: V) -> Result<Option<V>, CacheAccessError> {
        Ok(self.map.insert(key, value))
    }

    fn remove(&self, key: &K) -> Result<Option<V>, CacheAccessError> {
        Ok(self.map.remove(key).map(|(_, value)| value))
    }

    fn clear(&self) -> Result<(), CacheAccessError> {
        self.map.clear();
        Ok(())
    }

    fn size(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> HashSet<K> {
        self.map.iter().map(|entry| entry.key().clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.map.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl<K, V> ManagedCache for MapCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }
}

impl<K, V> fmt::Display for MapCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.map.len();
        let noun = if count == 1 { "entry" } else { "entries" };
        write!(f, "MapCache '{}' ({} {})", self.name, count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract() {
        let cache: MapCache<u64, &'static str> = MapCache::new("sessions");

        assert_eq!(cache.put(1, "alice").unwrap(), None);
        assert_eq!(cache.put(2, "bob").unwrap(), None);
        assert_eq!(cache.put(1, "carol").unwrap(), Some("alice"));
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.keys(), HashSet::from([1, 2]));

        let mut values = cache.values();
        values.sort_unstable();
        assert_eq!(values, vec!["bob", "carol"]);

        assert_eq!(cache.remove(&2).unwrap(), Some("bob"));
        cache.clear().unwrap();
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.get(&1).unwrap(), None);
    }

    #[test]
    fn test_display() {
        let cache: MapCache<u64, u64> = MapCache::new("ids");
        cache.put(1, 1).unwrap();
        assert_eq!(cache.to_string(), "MapCache 'ids' (1 entry)");

        cache.put(2, 2).unwrap();
        assert_eq!(cache.to_string(), "MapCache 'ids' (2 entries)");
    }

    #[test]
    fn test_has_no_release_hook() {
        let handle = MapCache::<u64, u64>::new("ids").into_handle();
        assert!(!handle.has_release_hook());
        assert!(handle.release().is_ok());
    }
}

//! Creation strategies the registry delegates cache construction to.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use super::{BoundedCache, CacheConfig, CacheHandle, MapCache};
use crate::error::CacheCreationError;

/// Builds a new cache for a given name.
///
/// The registry may call `create` more than once for the same name when
/// callers race; only one result is kept and the others are dropped.
pub trait CacheFactory: Send + Sync {
    fn create(&self, name: &str) -> Result<CacheHandle, CacheCreationError>;
}

impl<F> CacheFactory for F
where
    F: Fn(&str) -> Result<CacheHandle, CacheCreationError> + Send + Sync,
{
    fn create(&self, name: &str) -> Result<CacheHandle, CacheCreationError> {
        self(name)
    }
}

/// Builds [`BoundedCache`]s, so every cache the registry hands out has a
/// capacity ceiling.
///
/// Individual names can be given their own [`CacheConfig`].
pub struct MemoryConstrainedFactory<K, V> {
    default_config: CacheConfig,
    overrides: HashMap<String, CacheConfig>,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> MemoryConstrainedFactory<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(default_config: CacheConfig) -> Self {
        Self {
            default_config,
            overrides: HashMap::new(),
            _types: PhantomData,
        }
    }

    /// Use `config` instead of the default for the cache called `name`.
    ///
    /// The name is trimmed the same way the registry trims lookups.
    #[must_use]
    pub fn with_override(mut self, name: &str, config: CacheConfig) -> Self {
        self.overrides.insert(name.trim().to_string(), config);
        self
    }

    /// The config a cache called `name` will be built with.
    pub fn config_for(&self, name: &str) -> &CacheConfig {
        self.overrides.get(name).unwrap_or(&self.default_config)
    }
}

impl<K, V> Default for MemoryConstrainedFactory<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K, V> CacheFactory for MemoryConstrainedFactory<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn create(&self, name: &str) -> Result<CacheHandle, CacheCreationError> {
        let config = self.config_for(name);
        if config.max_capacity == 0 {
            return Err(CacheCreationError::new(
                name,
                "max_capacity must be greater than zero",
            ));
        }

        debug!(
            "Building bounded cache '{}' (capacity {})",
            name, config.max_capacity
        );
        Ok(BoundedCache::<K, V>::new(name, config).into_handle())
    }
}

/// Builds unbounded [`MapCache`]s.
pub struct MapCacheFactory<K, V> {
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> MapCacheFactory<K, V> {
    pub fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<K, V> Default for MapCacheFactory<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheFactory for MapCacheFactory<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn create(&self, name: &str) -> Result<CacheHandle, CacheCreationError> {
        Ok(MapCache::<K, V>::new(name).into_handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_applies_to_named_cache_only() {
        let factory: MemoryConstrainedFactory<u64, String> =
            MemoryConstrainedFactory::default().with_override("hot", CacheConfig::hot_data());

        assert_eq!(factory.config_for("hot"), &CacheConfig::hot_data());
        assert_eq!(factory.config_for("other"), &CacheConfig::default());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let factory: MemoryConstrainedFactory<u64, String> =
            MemoryConstrainedFactory::new(CacheConfig::with_capacity(0));

        let err = factory.create("users").unwrap_err();
        assert_eq!(err.name, "users");
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = |name: &str| -> Result<CacheHandle, CacheCreationError> {
            Ok(MapCache::<u64, u64>::new(name).into_handle())
        };

        let handle = factory.create("ids").unwrap();
        assert_eq!(handle.name(), "ids");
        assert!(handle.typed::<u64, u64>().is_some());
    }
}

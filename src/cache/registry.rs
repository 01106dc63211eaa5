//! Cache registry - Central management for all named caches.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use super::{Cache, CacheFactory, CacheHandle};
use crate::config::Config;
use crate::error::{RegistryError, ShutdownError};

/// Default upper bound on shutdown passes.
pub const DEFAULT_SHUTDOWN_PASSES: usize = 8;

/// Central registry handing out named caches built by a [`CacheFactory`].
///
/// Each name maps to at most one cache for the lifetime of the registry or
/// until [`shutdown`](Self::shutdown). Clones share the same caches.
///
/// ## Example
///
/// ```rust
/// use cache_registry::cache::{CacheConfig, CacheRegistry, MemoryConstrainedFactory};
///
/// let registry = CacheRegistry::new(
///     MemoryConstrainedFactory::<i64, String>::new(CacheConfig::default()),
/// );
///
/// let users = registry.get_typed::<i64, String>("users").unwrap();
/// users.put(1, "alice".to_string()).unwrap();
///
/// // Later, the same cache comes back.
/// let again = registry.get_or_create("users").unwrap();
/// assert_eq!(again.typed::<i64, String>().unwrap().get(&1).unwrap().as_deref(), Some("alice"));
///
/// registry.shutdown().unwrap();
/// assert!(registry.is_empty());
/// ```
pub struct CacheRegistry<F> {
    caches: Arc<DashMap<String, CacheHandle>>,
    factory: Arc<F>,
    shutdown_passes: usize,
}

impl<F> Clone for CacheRegistry<F> {
    fn clone(&self) -> Self {
        Self {
            caches: Arc::clone(&self.caches),
            factory: Arc::clone(&self.factory),
            shutdown_passes: self.shutdown_passes,
        }
    }
}

impl<F: CacheFactory> CacheRegistry<F> {
    /// Create an empty registry that builds caches with `factory`.
    pub fn new(factory: F) -> Self {
        info!("Cache registry initialized");
        Self {
            caches: Arc::new(DashMap::new()),
            factory: Arc::new(factory),
            shutdown_passes: DEFAULT_SHUTDOWN_PASSES,
        }
    }

    /// Create an empty registry using the limits from `config`.
    pub fn with_config(factory: F, config: &Config) -> Self {
        Self::new(factory).shutdown_passes(config.shutdown_passes)
    }

    /// Set how many snapshot-and-release passes `shutdown` may run.
    #[must_use]
    pub fn shutdown_passes(mut self, passes: usize) -> Self {
        self.shutdown_passes = passes.max(1);
        self
    }

    /// The factory caches are built with.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Get the cache called `name`, creating it on first use.
    ///
    /// Creation is optimistic: two callers racing on a new name may both run
    /// the factory, but only the first insert is kept and every caller gets
    /// that same cache back.
    ///
    /// # Errors
    /// [`RegistryError::InvalidArgument`] if `name` is blank,
    /// [`RegistryError::Creation`] if the factory fails. A failed creation
    /// leaves nothing behind, so the call can be retried.
    pub fn get_or_create(&self, name: &str) -> Result<CacheHandle, RegistryError> {
        let name = validate_name(name)?;

        if let Some(existing) = self.caches.get(name) {
            return Ok(existing.value().clone());
        }

        let created = self.factory.create(name).inspect_err(|e| {
            warn!("Cache creation failed for '{}': {}", name, e);
        })?;

        let handle = match self.caches.entry(name.to_string()) {
            Entry::Occupied(winner) => {
                debug!("Cache '{}' created concurrently, discarding duplicate", name);
                winner.get().clone()
            }
            Entry::Vacant(slot) => {
                debug!("Created cache: {}", name);
                slot.insert(created).value().clone()
            }
        };

        Ok(handle)
    }

    /// Get the cache called `name` as a typed [`Cache`], creating it on first use.
    ///
    /// # Errors
    /// Same as [`get_or_create`](Self::get_or_create), plus
    /// [`RegistryError::TypeMismatch`] when the cache serves other key/value types.
    pub fn get_typed<K: 'static, V: 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<dyn Cache<K, V>>, RegistryError> {
        let handle = self.get_or_create(name)?;
        handle
            .typed::<K, V>()
            .ok_or_else(|| RegistryError::TypeMismatch {
                name: handle.name().to_string(),
                expected: std::any::type_name::<dyn Cache<K, V>>(),
                actual: handle.type_name(),
            })
    }
}

impl<F> CacheRegistry<F> {
    /// Get an existing cache by name without creating it.
    pub fn get(&self, name: &str) -> Option<CacheHandle> {
        self.caches
            .get(name.trim())
            .map(|entry| entry.value().clone())
    }

    /// Check if a cache with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.caches.contains_key(name.trim())
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Get a list of all registered cache names.
    pub fn cache_names(&self) -> Vec<String> {
        self.caches.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Release every managed cache and empty the registry.
    ///
    /// Each pass snapshots the current names, then removes and releases each
    /// entry. Only the caller that removes an entry releases it, so racing
    /// shutdowns never release a cache twice. Caches inserted while a pass
    /// runs are picked up by the next one, up to the configured pass limit.
    ///
    /// The registry stays usable afterwards; later lookups create fresh caches.
    ///
    /// # Errors
    /// [`ShutdownError`] when any release hook failed (all caches are still
    /// attempted) or entries remained after the last pass.
    pub fn shutdown(&self) -> Result<(), ShutdownError> {
        let mut failures = Vec::new();
        let mut released = 0usize;

        for pass in 1..=self.shutdown_passes {
            if self.caches.is_empty() {
                break;
            }

            let names = self.cache_names();
            debug!("Shutdown pass {}: {} cache(s)", pass, names.len());

            for name in names {
                let Some((name, handle)) = self.caches.remove(&name) else {
                    continue;
                };

                if !handle.has_release_hook() {
                    debug!("Cache '{}' has no release hook, skipping", name);
                    continue;
                }

                match handle.release() {
                    Ok(()) => released += 1,
                    Err(e) => {
                        warn!("Failed to release cache '{}': {}", name, e);
                        failures.push(e);
                    }
                }
            }
        }

        let remaining = self.caches.len();
        if failures.is_empty() && remaining == 0 {
            info!("Cache registry shut down ({} cache(s) released)", released);
            return Ok(());
        }

        if remaining > 0 {
            warn!(
                "Shutdown gave up after {} pass(es) with {} cache(s) still registered",
                self.shutdown_passes, remaining
            );
        }

        Err(ShutdownError {
            failures,
            remaining,
        })
    }
}

fn validate_name(name: &str) -> Result<&str, RegistryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidArgument(
            "cache name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

impl<F> fmt::Display for CacheRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handles: Vec<CacheHandle> = self
            .caches
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        write!(f, "CacheRegistry with {} cache(s): [", handles.len())?;
        for (i, handle) in handles.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{handle}")?;
        }
        f.write_str("]")
    }
}

impl<F> fmt::Debug for CacheRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("cache_count", &self.caches.len())
            .field("cache_names", &self.cache_names())
            .field("shutdown_passes", &self.shutdown_passes)
            .finish()
    }
}

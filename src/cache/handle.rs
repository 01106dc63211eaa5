//! Type-erased, shareable handle to a managed cache.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use super::{Cache, ManagedCache};
use crate::error::ReleaseError;

/// A cheaply clonable handle to a cache held by the registry.
///
/// The registry stores handles without knowing their key/value types.
/// Callers that know them recover a typed view with [`CacheHandle::typed`].
#[derive(Clone)]
pub struct CacheHandle {
    managed: Arc<dyn ManagedCache>,
    // Holds an `Arc<dyn Cache<K, V>>` for the K/V the cache was built with.
    typed: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheHandle {
    /// Wrap a cache that serves keys of type `K` and values of type `V`.
    pub fn new<K, V, C>(cache: C) -> Self
    where
        K: 'static,
        V: 'static,
        C: Cache<K, V> + ManagedCache,
    {
        Self::from_arc::<K, V, C>(Arc::new(cache))
    }

    /// Same as [`CacheHandle::new`] for a cache that is already shared.
    pub fn from_arc<K, V, C>(cache: Arc<C>) -> Self
    where
        K: 'static,
        V: 'static,
        C: Cache<K, V> + ManagedCache,
    {
        let typed: Arc<dyn Cache<K, V>> = cache.clone();
        let managed: Arc<dyn ManagedCache> = cache;

        Self {
            managed,
            typed: Arc::new(typed),
            type_name: type_name::<C>(),
        }
    }

    /// Name the cache was created under.
    pub fn name(&self) -> &str {
        self.managed.name()
    }

    /// Concrete type name of the wrapped cache.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the typed view, or `None` if the cache was built for other types.
    pub fn typed<K: 'static, V: 'static>(&self) -> Option<Arc<dyn Cache<K, V>>> {
        self.typed.downcast_ref::<Arc<dyn Cache<K, V>>>().cloned()
    }

    /// Whether both handles point at the same cache instance.
    pub fn ptr_eq(&self, other: &CacheHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.managed), Arc::as_ptr(&other.managed))
    }

    /// Run the cache's release hook. Caches without one succeed trivially.
    pub(crate) fn release(&self) -> Result<(), ReleaseError> {
        match self.managed.release_hook() {
            Some(hook) => hook.release(),
            None => Ok(()),
        }
    }

    /// Whether the cache exposes a release hook.
    pub(crate) fn has_release_hook(&self) -> bool {
        self.managed.release_hook().is_some()
    }
}

impl fmt::Display for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.managed, f)
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("name", &self.name())
            .field("type", &self.type_name)
            .finish()
    }
}

//! Cache module - Named cache registry over pluggable backing stores.
//!
//! ## Architecture
//!
//! The cache system follows a registry pattern:
//! - `CacheRegistry` - Central registry holding all named caches
//! - `CacheFactory` - Creation strategy the registry calls for unknown names
//! - `Cache` / `ManagedCache` - What a backing store must provide
//! - `BoundedCache` / `MapCache` - Moka-backed and DashMap-backed stores
//!
//! ## Usage
//!
//! ```rust
//! use cache_registry::cache::{CacheConfig, CacheRegistry, MemoryConstrainedFactory};
//!
//! let registry = CacheRegistry::new(MemoryConstrainedFactory::<i64, String>::new(
//!     CacheConfig::default(),
//! ));
//!
//! let users = registry.get_typed::<i64, String>("users").unwrap();
//! users.put(42, "alice".to_string()).unwrap();
//!
//! registry.shutdown().unwrap();
//! ```

mod bounded;
mod config;
mod factory;
mod handle;
mod map;
mod registry;
mod traits;

pub use bounded::BoundedCache;
pub use config::CacheConfig;
pub use factory::{CacheFactory, MapCacheFactory, MemoryConstrainedFactory};
pub use handle::CacheHandle;
pub use map::MapCache;
pub use registry::{CacheRegistry, DEFAULT_SHUTDOWN_PASSES};
pub use traits::{Cache, ManagedCache, Release};

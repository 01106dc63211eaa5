//! cache-registry - Named cache registry with coordinated shutdown.
//!
//! Hands out named caches, creating each lazily on first request, and
//! releases all of them together when the owner shuts down.
//!
//! ## Architecture
//!
//! - `cache` - Registry, creation strategies, and backing stores
//! - `config` - Environment configuration
//! - `error` - Error types

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheHandle, CacheRegistry};
pub use config::Config;
pub use error::{RegistryError, ShutdownError};

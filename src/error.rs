//! Error types for the cache registry and the cache contract.

use thiserror::Error;

/// Boxed underlying cause carried by creation and release errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`CacheRegistry`](crate::cache::CacheRegistry) operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed input, such as an empty cache name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The creation strategy failed. No entry was inserted.
    #[error(transparent)]
    Creation(#[from] CacheCreationError),

    /// The cache exists but was not built for the requested key/value types.
    #[error("cache '{name}' has type {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A creation strategy could not build a cache.
#[derive(Debug, Error)]
#[error("failed to create cache '{name}': {message}")]
pub struct CacheCreationError {
    /// Name of the cache that was being created.
    pub name: String,
    /// Human-readable reason.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<BoxError>,
}

impl CacheCreationError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        name: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// The backing store failed while serving a cache operation.
#[derive(Debug, Error)]
#[error("cache access failed: {message}")]
pub struct CacheAccessError {
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl CacheAccessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// A single cache failed to release its resources.
#[derive(Debug, Error)]
#[error("failed to release cache '{name}': {message}")]
pub struct ReleaseError {
    pub name: String,
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl ReleaseError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        name: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Aggregate failure of [`CacheRegistry::shutdown`](crate::cache::CacheRegistry::shutdown).
///
/// Every managed cache is attempted before this is returned, so `failures`
/// lists all release hooks that failed. `remaining` counts entries still
/// registered when the pass limit ran out.
#[derive(Debug, Error)]
#[error("shutdown incomplete: {} release failure(s), {remaining} cache(s) left registered", .failures.len())]
pub struct ShutdownError {
    pub failures: Vec<ReleaseError>,
    pub remaining: usize,
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_creation_error_keeps_cause() {
        let io = std::io::Error::other("disk on fire");
        let err = CacheCreationError::with_source("users", "backing store unavailable", io);

        assert_eq!(
            err.to_string(),
            "failed to create cache 'users': backing store unavailable"
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_registry_error_is_transparent_for_creation() {
        let err: RegistryError = CacheCreationError::new("broken", "nope").into();
        assert_eq!(err.to_string(), "failed to create cache 'broken': nope");
    }

    #[test]
    fn test_shutdown_error_message() {
        let err = ShutdownError {
            failures: vec![ReleaseError::new("a", "x"), ReleaseError::new("b", "y")],
            remaining: 0,
        };
        assert_eq!(
            err.to_string(),
            "shutdown incomplete: 2 release failure(s), 0 cache(s) left registered"
        );
    }
}

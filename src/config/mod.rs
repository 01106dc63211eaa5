//! Configuration module.
//!
//! Loads registry and cache settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_SHUTDOWN_PASSES};
use crate::error::ConfigError;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Settings every bounded cache is built with.
    pub cache: CacheConfig,

    /// Upper bound on snapshot-and-release passes during shutdown.
    pub shutdown_passes: usize,

    /// Cache names to create at startup (comma-separated `CACHE_PRELOAD`).
    pub preload: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            shutdown_passes: DEFAULT_SHUTDOWN_PASSES,
            preload: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = CacheConfig::default();

        let max_capacity = parse_var(&lookup, "CACHE_MAX_CAPACITY", "an unsigned integer")?
            .unwrap_or(defaults.max_capacity);

        // 0 disables the timer.
        let ttl = match parse_var::<u64, _>(&lookup, "CACHE_TTL_SECS", "a number of seconds")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.ttl,
        };
        let tti = parse_var::<u64, _>(&lookup, "CACHE_TTI_SECS", "a number of seconds")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let shutdown_passes =
            parse_var::<usize, _>(&lookup, "REGISTRY_SHUTDOWN_PASSES", "a positive integer")?
                .unwrap_or(DEFAULT_SHUTDOWN_PASSES);
        if shutdown_passes == 0 {
            return Err(ConfigError::Invalid {
                key: "REGISTRY_SHUTDOWN_PASSES",
                value: "0".to_string(),
                expected: "a positive integer",
            });
        }

        let preload = lookup("CACHE_PRELOAD")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            cache: CacheConfig {
                max_capacity,
                ttl,
                tti,
            },
            shutdown_passes,
            preload,
        })
    }
}

fn parse_var<T, L>(
    lookup: &L,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| ConfigError::Invalid {
        key,
        value: raw.clone(),
        expected,
    })
}

//! cache-registry - Demo service hosting a named cache registry.
//!
//! Builds a memory-bounded registry from environment configuration,
//! preloads the configured caches, and shuts everything down on Ctrl-C.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cache_registry::cache::{CacheRegistry, MemoryConstrainedFactory};
use cache_registry::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cache_registry=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting cache registry...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Cache defaults: {:?}", config.cache);

    let factory = MemoryConstrainedFactory::<String, String>::new(config.cache.clone());
    let registry = CacheRegistry::with_config(factory, &config);

    for name in &config.preload {
        registry.get_or_create(name)?;
    }
    info!("{}", registry);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    // Release hooks may block; keep them off the async workers.
    let closing = registry.clone();
    match tokio::task::spawn_blocking(move || closing.shutdown()).await? {
        Ok(()) => info!("{}", registry),
        Err(e) => {
            for failure in &e.failures {
                error!("{}", failure);
            }
            return Err(e.into());
        }
    }

    Ok(())
}

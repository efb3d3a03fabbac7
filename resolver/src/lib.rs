pub mod config;
pub mod errors;
pub mod key;
pub mod metrics_defs;
pub mod redis_store;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod testutils;

use config::StoreConfig;
use errors::StoreError;
use redis_store::RedisStore;
use std::sync::Arc;
use std::time::Duration;
use store::{IndexStore, MemoryStore};

pub use errors::IndexError;
pub use resolver::{IndexResolver, QueryParams, resolve};

pub async fn get_store(config: StoreConfig) -> Result<Arc<dyn IndexStore>, StoreError> {
    let store: Arc<dyn IndexStore> = match config {
        StoreConfig::Memory { entries } => {
            tracing::warn!(
                "Serving index documents from the in-memory store. This is unsafe for production use."
            );
            Arc::new(MemoryStore::new(entries))
        }
        StoreConfig::Redis { url, timeout_ms } => Arc::new(
            RedisStore::connect(&url, timeout_ms.map(Duration::from_millis)).await?,
        ),
    };
    Ok(store)
}

//! The key-value capability consumed by the router, plus its backends.

pub mod memory;
pub mod spanner;
#[cfg(test)]
pub mod testing;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, KvBackend};

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

/// An asynchronous string key-value store.
///
/// Implementations own their consistency guarantees; callers only rely on a
/// completed `put` being visible to a subsequent `get` on the same key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, overwriting any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Shared handle to whichever backend was configured at startup
pub type SharedKvStore = Arc<dyn KvStore>;

/// Build the backend selected by `config.kv_backend`
pub async fn from_config(config: &Config) -> Result<SharedKvStore> {
    match (config.kv_backend, &config.spanner) {
        (KvBackend::Memory, _) => {
            tracing::info!("Using in-memory key-value store");
            Ok(Arc::new(MemoryStore::new()))
        }
        (KvBackend::Spanner, Some(spanner)) => {
            Ok(Arc::new(SpannerStore::from_config(spanner).await?))
        }
        (KvBackend::Spanner, None) => {
            anyhow::bail!("Spanner backend selected but no Spanner configuration was loaded")
        }
    }
}

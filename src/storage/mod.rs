//! Key-value store for the cached dataset
//!
//! The store is injected into the dataset cache so the backing service can be
//! swapped without touching lookup code. Values are opaque strings, the
//! caller owns their encoding.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{CacheBackend, CacheConfig};
use crate::errors::StoreResult;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// String-keyed store with read and overwrite
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, `None` if never written
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn put(&self, key: &str, value: String) -> StoreResult<()>;
}

/// Build the store selected by `cache.backend`
pub fn build_store(config: &CacheConfig) -> Arc<dyn KeyValueStore> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
        CacheBackend::File => Arc::new(FileStore::new(config.path.clone())),
    }
}

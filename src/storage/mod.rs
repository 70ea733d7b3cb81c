use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StorageConfig;
use crate::errors::{LinkStashError, Result};

pub mod file;
pub mod keys;
pub mod memory;
pub mod models;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;
pub use models::{ClickRecord, LogEntry, LogMeta, ShortLink};

/// String key to string value store. Values are JSON documents owned by the
/// caller; the store never looks inside them.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    async fn set_item(&self, key: &str, value: String) -> Result<()>;
    async fn keys(&self) -> Result<Vec<String>>;
    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match config.backend.as_str() {
            "file" => Arc::new(FileKvStore::open(&config.data_file)?),
            "memory" => Arc::new(MemoryKvStore::new()),
            other => {
                return Err(LinkStashError::storage_backend_not_found(format!(
                    "Unknown storage backend '{}', expected 'file' or 'memory'",
                    other
                )));
            }
        };
        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let config = StorageConfig {
            backend: "sled".to_string(),
            data_file: "unused.json".to_string(),
        };
        let err = StorageFactory::create(&config).err().unwrap();
        assert!(matches!(err, LinkStashError::StorageBackendNotFound(_)));
    }

    #[test]
    fn test_factory_memory_backend() {
        let config = StorageConfig {
            backend: "memory".to_string(),
            data_file: String::new(),
        };
        let store = StorageFactory::create(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}

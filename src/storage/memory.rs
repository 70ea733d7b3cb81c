use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::KvStore;
use crate::errors::Result;

/// Process-local store, nothing survives a restart.
#[derive(Default)]
pub struct MemoryKvStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.items.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.read().keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::KvStore;
use crate::errors::{LinkStashError, Result};

/// All keys live in one JSON object file: `{ "<key>": "<json text>", ... }`.
///
/// Every operation re-reads the file so that edits made by another process
/// between calls are picked up. Writes go through a temp file and a rename.
///
/// File I/O is blocking and runs under a sync mutex on the calling task;
/// data files are small, so it is not moved to `spawn_blocking`.
pub struct FileKvStore {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl FileKvStore {
    /// Open the store, creating an empty file if none exists yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        if !file_path.exists() {
            if let Some(parent) = file_path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&file_path, "{}")?;
            info!("Created empty data file: {}", file_path.display());
        }

        Ok(FileKvStore {
            file_path,
            lock: Mutex::new(()),
        })
    }

    fn load_from_file(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Data file missing, treating as empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str::<BTreeMap<String, String>>(&content).map_err(|e| {
            error!("Failed to parse data file {}: {}", self.file_path.display(), e);
            LinkStashError::serialization(format!(
                "Failed to parse data file {}: {}",
                self.file_path.display(),
                e
            ))
        })
    }

    fn save_to_file(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load_from_file()?.remove(key))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock();
        let mut items = self.load_from_file()?;
        items.insert(key.to_string(), value);
        self.save_to_file(&items)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock();
        Ok(self.load_from_file()?.into_keys().collect())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

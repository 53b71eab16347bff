//! JSON-file durable store.
//!
//! The whole store is one JSON object of string keys to string values. It is
//! loaded on open and rewritten (temp file + rename) after every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::DurableStore;
use crate::error::StorageError;

/// Store persisted to a single JSON file on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. A corrupt file is logged and
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let items = Self::load_from_disk(&path)?;
        debug!(path = %path.display(), entries = items.len(), "Opened file storage");

        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(items) => Ok(items),
                Err(e) => {
                    warn!("Storage file {} is corrupt, starting empty: {}", path.display(), e);
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_to_disk(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.items)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DurableStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save_to_disk() {
            // Keep memory consistent with what is on disk
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError> {
        let Some(old) = self.items.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.save_to_disk() {
            self.items.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.items.keys().cloned().collect())
    }
}

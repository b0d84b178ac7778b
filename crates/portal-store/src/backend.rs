//! Storage backends holding serialized entries.
//!
//! A backend is a flat map from key to serialized text. It knows nothing
//! about expiry or value types.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StoreError};

pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

fn entries_size(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// In-process backend with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota: Some(bytes),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(limit) = self.quota {
            let existing = entries.get(key).map_or(0, |v| key.len() + v.len());
            let needed = entries_size(&entries) - existing + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Backend persisting every entry in one JSON object file.
///
/// Each mutation rewrites the file through a temp file and rename. A missing
/// file reads as empty.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Serialize {
            key: String::new(),
            source: e,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory for",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Io {
            operation: "replace",
            path: self.path.clone(),
            source: e,
        })
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        // A damaged file is replaced rather than blocking every later write.
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { path, .. }) => {
                tracing::warn!(path = %path.display(), "discarding unreadable store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut entries);
        self.save(&entries)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(BTreeMap::clear)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.into_keys().collect())
    }
}

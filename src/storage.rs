//! Namespaced key-value storage for session data.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plays the role browser `localStorage` plays for a web console: a flat
//! string map that survives restarts. [`Storage`] adds the namespace prefix
//! and JSON encoding so callers read and write typed values.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail: a missing or unparsable value reads as `None`. Failed
//! writes are logged and swallowed, so a read-only disk degrades to an
//! in-memory session instead of breaking login.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("value encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw string map behind [`Storage`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the value cannot be persisted.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Drop every entry, including ones outside any namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the change cannot be persisted.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// A JSON object on disk, loaded once and rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "storage opened");
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, mutate: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StorageError> {
        let Ok(mut entries) = self.entries.lock() else {
            return Ok(());
        };
        mutate(&mut entries);
        let raw = serde_json::to_string_pretty(&*entries)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }
        std::fs::write(&self.path, raw).map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(HashMap::clear)
    }
}

// =============================================================================
// NAMESPACED JSON VIEW
// =============================================================================

/// Prefixed, JSON-encoding view over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl Storage {
    pub fn new(inner: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self { inner, prefix: prefix.into() }
    }

    /// In-memory storage with the given prefix.
    #[must_use]
    pub fn in_memory(prefix: &str) -> Self {
        Self::new(Arc::new(MemoryStore::new()), prefix)
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Read and decode `key`. Missing and undecodable values both read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.get(&self.key(key))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|raw| self.inner.set(&self.key(key), raw));
        if let Err(e) = result {
            tracing::error!(key, error = %e, "storage set failed");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(&self.key(key)) {
            tracing::error!(key, error = %e, "storage remove failed");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.inner.clear() {
            tracing::error!(error = %e, "storage clear failed");
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

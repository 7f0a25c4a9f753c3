//! # Storage Backends
//!
//! String key → string value storage, shaped like browser local storage.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         StorageBackend                                  │
//! │        get_item(key) / set_item(key, value) / remove_item(key)          │
//! │                                                                         │
//! │  ┌───────────────────────────┐      ┌───────────────────────────────┐  │
//! │  │      MemoryStorage        │      │         FileStorage           │  │
//! │  │  Arc<DashMap<key, json>>  │      │  <data_dir>/<key>.json        │  │
//! │  │  clones share one map     │      │  survives process restarts    │  │
//! │  │  (tests, embedded use)    │      │  (the native "browser profile")│  │
//! │  └───────────────────────────┘      └───────────────────────────────┘  │
//! │                                                                         │
//! │  Keys in use: mockDatabase, currentUserId, cart, wishlist, user        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes replace the whole value: there is no partial update and no
//! cross-process locking, so the last writer of a key wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Local-storage style persistence.
pub trait StorageBackend: Send + Sync {
    /// Value stored under `key`, `None` when absent.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Clones share the same map, so a second store opened
/// over a clone sees everything the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// One file per key inside a data directory.
///
/// ## Example
/// ```rust,no_run
/// use nutri_store::backend::{FileStorage, StorageBackend};
///
/// let storage = FileStorage::new("/tmp/nutrihealth")?;
/// storage.set_item("cart", "[]")?;
/// # Ok::<(), nutri_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the data directory.
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;
        debug!(dir = %dir.display(), "File storage ready");
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        // write-then-rename: readers never observe a partial snapshot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StoreError::io(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(key, e))
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Storage backends for cached provider responses.
//!
//! The [`CacheStore`] trait is the seam between the response cache and wherever
//! entries physically live. Three implementations are provided:
//!
//! * [`MemoryStore`]: a process-local map, shared between all users of the same `Arc`.
//! * [`DiskStore`]: one `bincode` file per request key, written atomically.
//! * [`NoopStore`]: stores nothing, turning caching off.

use crate::cache::error::CacheError;
use crate::cache::request_key::RequestKey;
use crate::utils::ensure_cache_dir_exists;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tempfile::NamedTempFile;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();
const CACHE_FILE_EXTENSION: &str = "bin";

/// A raw provider response body and the moment it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub stored_at: DateTime<Utc>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Younger than `freshness` at `now`. An entry from the future (clock moved
    /// backwards) counts as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        match now.signed_duration_since(self.stored_at).to_std() {
            Ok(age) => age < freshness,
            Err(_) => false,
        }
    }
}

/// Mapping from [`RequestKey`] to [`CachedResponse`].
///
/// Implementations must never expose a partially written entry: a reader sees
/// either the previous entry or the complete new one.
/// Methods are blocking; the response cache calls them from `spawn_blocking`.
pub trait CacheStore: Send + Sync + Debug {
    fn load(&self, key: &RequestKey) -> Result<Option<CachedResponse>, CacheError>;

    fn store(&self, key: &RequestKey, entry: CachedResponse) -> Result<(), CacheError>;

    fn remove(&self, key: &RequestKey) -> Result<(), CacheError>;

    /// Drops every entry that is no longer fresh at `now` and returns how many were dropped.
    ///
    /// Stores that don't accumulate entries in memory can keep the default, which does nothing.
    fn purge_stale(&self, _now: DateTime<Utc>, _freshness: Duration) -> Result<usize, CacheError> {
        Ok(0)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<RequestKey, Arc<CachedResponse>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &RequestKey) -> Result<Option<CachedResponse>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).map(|entry| entry.as_ref().clone()))
    }

    fn store(&self, key: &RequestKey, entry: CachedResponse) -> Result<(), CacheError> {
        // Whole entries are swapped under the write lock, never mutated in place.
        let entry = Arc::new(entry);
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.clone(), entry);
        Ok(())
    }

    fn remove(&self, key: &RequestKey) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn purge_stale(&self, now: DateTime<Utc>, freshness: Duration) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, freshness));
        Ok(before - entries.len())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

impl CacheStore for NoopStore {
    fn load(&self, _key: &RequestKey) -> Result<Option<CachedResponse>, CacheError> {
        Ok(None)
    }

    fn store(&self, _key: &RequestKey, _entry: CachedResponse) -> Result<(), CacheError> {
        Ok(())
    }

    fn remove(&self, _key: &RequestKey) -> Result<(), CacheError> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct DiskEntry {
    stored_at_millis: i64,
    body: Vec<u8>,
}

/// Stores every entry as `<cache_dir>/<request key>.bin`.
///
/// Writes go to a temporary file in the same directory that is then renamed over
/// the target, which is atomic on the same filesystem.
#[derive(Debug, Clone)]
pub struct DiskStore {
    cache_dir: PathBuf,
}

impl DiskStore {
    /// Opens (and creates, if needed) a disk store rooted at `cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DirCreation`] if the directory cannot be created, or
    /// [`CacheError::NotADirectory`] if the path exists but is a file.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.into();
        ensure_cache_dir_exists(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &RequestKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key.storage_name(), CACHE_FILE_EXTENSION))
    }
}

impl CacheStore for DiskStore {
    fn load(&self, key: &RequestKey) -> Result<Option<CachedResponse>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Read(path, e)),
        };
        let (entry, _) = bincode::serde::decode_from_slice::<DiskEntry, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| CacheError::Decode(path.clone(), Box::new(e)))?;
        let stored_at = DateTime::<Utc>::from_timestamp_millis(entry.stored_at_millis)
            .ok_or_else(|| CacheError::CorruptEntry {
                path,
                reason: format!("timestamp {} ms is out of range", entry.stored_at_millis),
            })?;
        Ok(Some(CachedResponse {
            stored_at,
            body: entry.body,
        }))
    }

    fn store(&self, key: &RequestKey, entry: CachedResponse) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let disk_entry = DiskEntry {
            stored_at_millis: entry.stored_at.timestamp_millis(),
            body: entry.body,
        };
        let bytes = bincode::serde::encode_to_vec(&disk_entry, BINCODE_CONFIG)
            .map_err(|e| CacheError::Encode(Box::new(e)))?;

        let mut temp_file = NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| CacheError::Write(path.clone(), e))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| CacheError::Write(path.clone(), e))?;
        temp_file
            .flush()
            .map_err(|e| CacheError::Write(path.clone(), e))?;
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::Write(path.clone(), e.error))?;
        Ok(())
    }

    fn remove(&self, key: &RequestKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Remove(path, e)),
        }
    }
}

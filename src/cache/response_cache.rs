use crate::cache::error::CacheError;
use crate::cache::request_key::RequestKey;
use crate::cache::store::{CacheStore, CachedResponse, MemoryStore, NoopStore};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

/// Freshness window applied when nothing else is configured.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(60 * 60);

/// Serves provider responses for identical requests without a network round-trip
/// while they are younger than the freshness window.
///
/// The cache does not own a clock: callers pass the current time in, so tests can
/// move time forward deterministically. Cloning is cheap and clones share the store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    freshness: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, freshness: Duration) -> Self {
        Self { store, freshness }
    }

    pub fn in_memory(freshness: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), freshness)
    }

    /// A cache that never hits.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopStore), Duration::ZERO)
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns the cached body for `key` if it was stored less than the freshness window ago.
    ///
    /// Expired entries are removed. Entries that cannot be decoded, or decode to
    /// nonsense, are treated as misses so the next successful fetch overwrites them.
    pub async fn get_fresh(
        &self,
        key: &RequestKey,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        let store = Arc::clone(&self.store);
        let owned_key = key.clone();
        let loaded = task::spawn_blocking(move || store.load(&owned_key)).await?;

        let entry = match loaded {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Key {} not found", key);
                return Ok(None);
            }
            Err(CacheError::Decode(path, e)) => {
                warn!(
                    "Ignoring unreadable cache entry {}: {}",
                    path.display(),
                    e
                );
                return Ok(None);
            }
            Err(CacheError::CorruptEntry { path, reason }) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), reason);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if entry.is_fresh(now, self.freshness) {
            debug!("Key {} found and still fresh", key);
            Ok(Some(entry.body))
        } else {
            debug!("Key {} found but expired", key);
            self.remove(key).await?;
            Ok(None)
        }
    }

    pub async fn put(
        &self,
        key: &RequestKey,
        body: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let store = Arc::clone(&self.store);
        let key = key.clone();
        let entry = CachedResponse {
            stored_at: now,
            body,
        };
        let freshness = self.freshness;
        let purged = task::spawn_blocking(move || {
            store.store(&key, entry)?;
            store.purge_stale(now, freshness)
        })
        .await??;
        if purged > 0 {
            debug!("Purged {} stale cache entries", purged);
        }
        Ok(())
    }

    pub async fn remove(&self, key: &RequestKey) -> Result<(), CacheError> {
        let store = Arc::clone(&self.store);
        let key = key.clone();
        task::spawn_blocking(move || store.remove(&key)).await?
    }
}

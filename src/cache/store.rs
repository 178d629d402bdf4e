//! Cache store trait and the in-memory implementation

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur inside a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value backend with per-entry time-to-live
///
/// Backends may fail; callers go through [`super::CacheGateway`], which turns
/// every failure into a logged miss.
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` if absent or expired
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`
    fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`; removing a missing key is not an error
    fn delete(&self, key: &str) -> CacheResult<()>;
}

/// A cached value together with the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub stored_at: DateTime<Utc>,
    pub ttl: ChronoDuration,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::weeks(5200)),
        }
    }

    /// Returns how long ago the entry was stored
    pub fn age(&self) -> ChronoDuration {
        Utc::now() - self.stored_at
    }

    /// Checks whether the entry outlived its time-to-live
    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }
}

/// Process-local cache backed by a mutex-guarded map
///
/// Expired entries are evicted when read and swept on every write, so keys
/// that are never read again do not accumulate.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Backend("cache lock poisoned".to_string()))?;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Backend("cache lock poisoned".to_string()))?;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Backend("cache lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

//! Failure-swallowing front for a [`CacheStore`]

use crate::cache::store::{CacheError, CacheStore, MemoryCache};
use crate::config::CacheConfig;
use crate::text::content_hash;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Cache access used by the crawler
///
/// Values are stored as JSON. Every backend or serialization failure is
/// logged and reported as a miss (`None`) or `false`; nothing here returns an
/// error to the caller. A gateway without a store behaves as "no cache".
#[derive(Clone)]
pub struct CacheGateway {
    store: Option<Arc<dyn CacheStore>>,
    default_ttl: Duration,
}

impl CacheGateway {
    /// Creates a gateway over `store`
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self {
            store: Some(store),
            default_ttl,
        }
    }

    /// Creates a gateway that never stores anything
    pub fn disabled() -> Self {
        Self {
            store: None,
            default_ttl: Duration::from_secs(3600),
        }
    }

    /// Builds a gateway from configuration
    ///
    /// An enabled cache gets a fresh [`MemoryCache`]; a disabled one gets no
    /// store at all.
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            tracing::debug!("In-memory cache enabled (ttl {}s)", config.ttl_secs);
            Self::new(
                Arc::new(MemoryCache::new()),
                Duration::from_secs(config.ttl_secs),
            )
        } else {
            Self::disabled()
        }
    }

    /// Returns true if a backing store is configured
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Builds a stable cache key for `url` under `prefix`
    ///
    /// ```
    /// use docsift::cache::CacheGateway;
    ///
    /// let key = CacheGateway::key("https://example.com/docs", "crawl");
    /// assert!(key.starts_with("crawl:"));
    /// assert_eq!(key, CacheGateway::key("https://example.com/docs", "crawl"));
    /// ```
    pub fn key(url: &str, prefix: &str) -> String {
        format!("{}:{}", prefix, content_hash(url))
    }

    /// Reads and deserializes the value stored under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;

        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Cache get error for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(
                    "Cache get error for {}: {}",
                    key,
                    CacheError::Serialization(e)
                );
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`
    ///
    /// Uses the gateway's default TTL when `ttl` is `None`. Returns whether
    /// the value was stored.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(
                    "Cache set error for {}: {}",
                    key,
                    CacheError::Serialization(e)
                );
                return false;
            }
        };

        match store.set(key, raw, ttl.unwrap_or(self.default_ttl)) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Cache set error for {}: {}", key, e);
                false
            }
        }
    }

    /// Removes `key`; returns whether the backend accepted the delete
    pub fn delete(&self, key: &str) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };

        match store.delete(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Cache delete error for {}: {}", key, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("enabled", &self.is_enabled())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

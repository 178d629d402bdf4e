//! Cache module for crawl results
//!
//! This module provides:
//! - `CacheStore`: the key/value backend trait with per-entry TTL
//! - `MemoryCache`: a process-local backend
//! - `CacheGateway`: the front the crawler talks to, which never fails

mod gateway;
mod store;

pub use gateway::CacheGateway;
pub use store::{CacheEntry, CacheError, CacheResult, CacheStore, MemoryCache};

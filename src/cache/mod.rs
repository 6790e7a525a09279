// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-aside storage for explorer responses
//!
//! [`CacheGateway`] stores JSON-serialized values under string keys with an
//! optional expiry, on top of a pluggable [`CacheBackend`]:
//!
//! - [`RedisBackend`]: shared Redis server (default for deployments)
//! - [`MemoryBackend`]: in-process map with TTL, used in tests and offline runs
//! - [`NoOpBackend`]: disables caching entirely
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::cache::{CacheGateway, RedisBackend};
//! use std::{sync::Arc, time::Duration};
//!
//! let backend = RedisBackend::connect("redis://127.0.0.1/").await?;
//! let cache = CacheGateway::new(Arc::new(backend));
//! cache.initialize().await?;
//!
//! cache.set("etherscanv2:1:stats:ethprice:{}", &price, Duration::from_secs(10)).await?;
//! let cached: Option<serde_json::Value> = cache.get("etherscanv2:1:stats:ethprice:{}").await?;
//! ```

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CacheError;

mod gateway;
mod key;
mod memory;
mod noop;
mod redis_backend;

pub use gateway::CacheGateway;
pub use key::{canonical_json, explorer_cache_key};
pub use memory::MemoryBackend;
pub use noop::NoOpBackend;
pub use redis_backend::RedisBackend;

/// One page of a prefix scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next call; `0` when the scan is complete
    pub cursor: u64,
    /// Keys found in this page
    pub keys: Vec<String>,
}

/// Trait for cache storage backends
///
/// Values are opaque strings; serialization happens in [`CacheGateway`].
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Returns the raw value stored at `key`, if any and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` at `key`. `None` means no expiry.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), CacheError>;

    /// Deletes the given keys, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Returns one page of keys starting with `prefix`.
    ///
    /// Start with cursor `0` and continue until the returned cursor is `0`.
    /// Pages may be empty while the scan is still in progress.
    async fn scan_prefix(
        &self,
        cursor: u64,
        prefix: &str,
        count: usize,
    ) -> Result<ScanPage, CacheError>;

    /// Returns a human-readable name for this backend
    fn name(&self) -> &'static str;
}

/// Statistics about cache usage since the gateway was created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reads that found a decodable value
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Values written
    pub writes: u64,
    /// Entries deleted because they could not be decoded
    pub corrupt_evictions: u64,
    /// Entries removed through `delete` or `clear_prefix`
    pub removed: u64,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, writes={}, corrupt={}, removed={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.writes,
            self.corrupt_evictions,
            self.removed,
            self.hit_rate()
        )
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! JSON cache-aside gateway over a [`CacheBackend`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{CacheBackend, CacheStats};
use crate::errors::CacheError;

/// Keys requested per scan page, each deleted as one batch, in [`CacheGateway::clear_prefix`].
const SCAN_BATCH: usize = 500;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    corrupt_evictions: AtomicU64,
    removed: AtomicU64,
}

/// Stores JSON values under string keys with optional expiry.
///
/// Cloning is cheap; clones share the backend and statistics.
///
/// A stored value that cannot be decoded is deleted before
/// [`CacheError::Decode`] is returned, so the next read is a clean miss.
#[derive(Clone)]
pub struct CacheGateway {
    backend: Arc<dyn CacheBackend>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("backend", &self.backend.name())
            .field("counters", &self.counters)
            .finish()
    }
}

impl CacheGateway {
    /// Wraps a backend. Call [`initialize`](Self::initialize) before use.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Name of the underlying backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Verifies the backend is reachable.
    pub async fn initialize(&self) -> Result<(), CacheError> {
        self.backend.ping().await?;
        info!(backend = self.backend.name(), "Cache initialized");
        Ok(())
    }

    /// Returns the decoded value at `key`, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// [`CacheError::Decode`] if the stored value does not decode as `T`;
    /// the entry has been deleted by then. Backend failures are returned as
    /// [`CacheError::Backend`].
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.backend.get(key).await? else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache hit");
                Ok(Some(value))
            }
            Err(source) => {
                self.counters
                    .corrupt_evictions
                    .fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %source, "Evicting undecodable cache entry");
                if let Err(e) = self.backend.delete(&[key.to_string()]).await {
                    warn!(key, error = %e, "Failed to evict undecodable cache entry");
                }
                Err(CacheError::Decode {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// Serializes `value` as JSON and stores it at `key`.
    ///
    /// A zero `ttl` stores the value without expiry.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(value).map_err(|source| CacheError::Serialize {
            key: key.to_string(),
            source,
        })?;
        let ttl = (!ttl.is_zero()).then_some(ttl);
        self.backend.set(key, encoded, ttl).await?;
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Removes `key`, returning whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let removed = self.backend.delete(&[key.to_string()]).await?;
        self.counters.removed.fetch_add(removed, Ordering::Relaxed);
        Ok(removed > 0)
    }

    /// Removes every key starting with `prefix`, returning how many were
    /// deleted.
    ///
    /// Each scanned page is deleted before the next page is requested. A
    /// failed page leaves earlier deletions in place.
    pub async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut deleted = 0;
        let mut cursor = 0;
        loop {
            let page = self
                .backend
                .scan_prefix(cursor, prefix, SCAN_BATCH)
                .await?;
            if !page.keys.is_empty() {
                // A key reported twice is counted once, since the second
                // delete finds nothing
                let removed = self.backend.delete(&page.keys).await?;
                self.counters.removed.fetch_add(removed, Ordering::Relaxed);
                deleted += removed;
            }
            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        info!(prefix, deleted, "Cleared cache prefix");
        Ok(deleted)
    }

    /// Snapshot of usage statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            corrupt_evictions: self.counters.corrupt_evictions.load(Ordering::Relaxed),
            removed: self.counters.removed.load(Ordering::Relaxed),
        }
    }
}

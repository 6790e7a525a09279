// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory backend with per-entry expiry

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{CacheBackend, ScanPage};
use crate::errors::CacheError;

/// Entry in the memory backend
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    /// `None` when the entry never expires
    expires_at: Option<Instant>,
    /// Position in scan order, assigned on first insert
    seq: u64,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug)]
struct Store {
    entries: HashMap<String, MemoryEntry>,
    /// Keys by insertion sequence; scan cursors are lower bounds into this
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            // Cursor 0 means "start over", so sequences start at 1
            next_seq: 1,
        }
    }
}

impl Store {
    fn insert(&mut self, key: String, value: String, expires_at: Option<Instant>) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.clone());
        self.entries.insert(
            key,
            MemoryEntry {
                value,
                expires_at,
                seq,
            },
        );
    }

    fn remove(&mut self, key: &str) -> Option<MemoryEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }
}

/// In-process cache backend
///
/// Entries honour their TTL: an expired entry is dropped on the next read or
/// scan that touches it. Scans walk keys in insertion order and the cursor is
/// the sequence number to resume from, so deleting keys between pages never
/// shifts the remaining ones.
///
/// # Examples
///
/// ```rust
/// use chaingate::cache::{CacheGateway, MemoryBackend};
/// use std::sync::Arc;
///
/// let cache = CacheGateway::new(Arc::new(MemoryBackend::new()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: Mutex<Store>,
}

impl MemoryBackend {
    /// Creates an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let mut store = self.store.lock().await;
        store.purge_expired(Instant::now());
        store.entries.len()
    }

    /// Whether the backend holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stores a raw string, bypassing serialization. Used to plant corrupt
    /// entries in tests.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.lock().await.insert(key.into(), value.into(), None);
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut store = self.store.lock().await;
        let expired = match store.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.remove(key);
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.store
            .lock()
            .await
            .insert(key.to_string(), value, expires_at);
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut store = self.store.lock().await;
        let removed = keys
            .iter()
            .filter_map(|key| store.remove(key))
            .filter(|entry| !entry.is_expired(now))
            .count();
        Ok(removed as u64)
    }

    async fn scan_prefix(
        &self,
        cursor: u64,
        prefix: &str,
        count: usize,
    ) -> Result<ScanPage, CacheError> {
        let now = Instant::now();
        let mut store = self.store.lock().await;
        store.purge_expired(now);

        let count = count.max(1);
        let mut keys = Vec::new();
        let mut next = 0;
        for (&seq, key) in store.order.range(cursor.max(1)..) {
            if keys.len() == count {
                next = seq;
                break;
            }
            if key.starts_with(prefix) {
                keys.push(key.clone());
            }
        }

        Ok(ScanPage { cursor: next, keys })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Backend that stores nothing

use std::time::Duration;

use async_trait::async_trait;

use super::{CacheBackend, ScanPage};
use crate::errors::CacheError;

/// A backend that never stores anything
///
/// Every read is a miss and every write is discarded, so each explorer
/// request goes to the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBackend;

#[async_trait]
impl CacheBackend for NoOpBackend {
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: String,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _keys: &[String]) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn scan_prefix(
        &self,
        _cursor: u64,
        _prefix: &str,
        _count: usize,
    ) -> Result<ScanPage, CacheError> {
        Ok(ScanPage::default())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_never_returns_values() {
        let backend = NoOpBackend;
        backend.set("k", "1".into(), None).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
        assert_eq!(backend.delete(&["k".into()]).await.unwrap(), 0);
        assert_eq!(backend.name(), "noop");
    }
}

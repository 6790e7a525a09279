// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-chain node client pool
//!
//! Clients are created on first use from the RPC registry and reused for
//! the lifetime of the pool. Read access takes a shared lock; creating a
//! client takes the write lock only to insert it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::errors::{redact_url, RpcError};
use crate::registry::ChainRegistry;

use super::{AlloyNodeClient, NodeClient, NodeConfig};

/// Pooled node client
pub type PooledNode = Arc<dyn NodeClient>;

/// A thread-safe pool of node clients indexed by chain id
pub struct NodePool {
    registry: Arc<ChainRegistry>,
    nodes: RwLock<HashMap<u64, PooledNode>>,
    rate_limit_per_second: Option<u32>,
    timeout: Option<Duration>,
    logging: bool,
    log_payloads: bool,
}

impl std::fmt::Debug for NodePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePool")
            .field("chains", &self.chains())
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl NodePool {
    /// Empty pool resolving endpoints through `registry`
    #[must_use]
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            nodes: RwLock::new(HashMap::new()),
            rate_limit_per_second: None,
            timeout: None,
            logging: true,
            log_payloads: false,
        }
    }

    /// Pool with the node settings of `config`
    #[must_use]
    pub fn from_config(registry: Arc<ChainRegistry>, config: &GatewayConfig) -> Self {
        Self::new(registry)
            .with_rate_limit(config.rpc_rate_limit_per_second)
            .with_timeout(config.http_timeout)
            .with_logging(config.rpc_logging)
            .with_payload_logging(config.rpc_log_payloads)
    }

    /// Rate limit applied to each new client
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: Option<u32>) -> Self {
        self.rate_limit_per_second = requests_per_second;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Logs node request and response bodies at `trace`.
    #[must_use]
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// The RPC registry endpoints are resolved from
    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    /// Client for `chain_id`, created on first use.
    ///
    /// # Errors
    ///
    /// - [`RpcError::UnsupportedChain`] if the registry has no such chain
    /// - [`RpcError::NoEndpoint`] if none of its URLs is a usable HTTP endpoint
    /// - [`RpcError::InvalidUrl`] if the chosen URL cannot be parsed
    pub fn client(&self, chain_id: u64) -> Result<PooledNode, RpcError> {
        if let Some(node) = self.get(chain_id) {
            return Ok(node);
        }

        let urls = self.registry.rpc_urls(chain_id)?;
        let url = select_endpoint(&urls).ok_or(RpcError::NoEndpoint { chain_id })?;

        let mut config = NodeConfig::new(url)
            .for_chain(chain_id)
            .with_rate_limit_opt(self.rate_limit_per_second)
            .with_logging(self.logging)
            .with_payload_logging(self.log_payloads);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        let node: PooledNode = Arc::new(AlloyNodeClient::connect(chain_id, &config)?);

        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have connected while we were building
        let node = nodes.entry(chain_id).or_insert(node).clone();
        info!(chain_id, url = %redact_url(url), "Added node client to pool");
        Ok(node)
    }

    /// Installs `node` for `chain_id`, replacing any existing client.
    pub fn insert(&self, chain_id: u64, node: PooledNode) {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        if nodes.insert(chain_id, node).is_some() {
            debug!(chain_id, "Replaced node client");
        }
    }

    /// The pooled client for `chain_id`, without creating one.
    #[must_use]
    pub fn get(&self, chain_id: u64) -> Option<PooledNode> {
        self.nodes
            .read()
            .ok()
            .and_then(|nodes| nodes.get(&chain_id).cloned())
    }

    pub fn remove(&self, chain_id: u64) -> Option<PooledNode> {
        self.nodes
            .write()
            .ok()
            .and_then(|mut nodes| nodes.remove(&chain_id))
    }

    #[must_use]
    pub fn contains(&self, chain_id: u64) -> bool {
        self.nodes
            .read()
            .ok()
            .is_some_and(|nodes| nodes.contains_key(&chain_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().map(|nodes| nodes.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chain ids with a pooled client, ascending
    #[must_use]
    pub fn chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self
            .nodes
            .read()
            .map(|nodes| nodes.keys().copied().collect())
            .unwrap_or_default();
        chains.sort_unstable();
        chains
    }
}

/// First plain HTTP(S) URL with every placeholder substituted.
///
/// Registries also list websocket endpoints and URLs templated with keys
/// the gateway does not hold.
fn select_endpoint(urls: &[String]) -> Option<&str> {
    urls.iter()
        .map(String::as_str)
        .find(|url| {
            (url.starts_with("https://") || url.starts_with("http://")) && !url.contains("${")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Arc<ChainRegistry> {
        Arc::new(
            ChainRegistry::new("rpc", "http://unused", "unused.json")
                .with_api_key("project")
                .with_entries(vec![
                    json!({
                        "chainId": 1,
                        "name": "Ethereum Mainnet",
                        "rpc": [
                            "wss://mainnet.infura.io/ws/v3/${INFURA_API_KEY}",
                            "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
                            "https://eth.llamarpc.com"
                        ]
                    }),
                    json!({
                        "chainId": 5000,
                        "name": "Only Templated",
                        "rpc": ["https://rpc.example/${ALCHEMY_API_KEY}", "wss://ws.example"]
                    }),
                ]),
        )
    }

    #[test]
    fn test_select_endpoint_skips_ws_and_templates() {
        let urls = vec![
            "wss://a".to_string(),
            "https://b/${KEY}".to_string(),
            "https://c".to_string(),
        ];
        assert_eq!(select_endpoint(&urls), Some("https://c"));
        assert_eq!(select_endpoint(&[]), None);
    }

    #[tokio::test]
    async fn test_client_resolves_first_http_url_and_is_reused() {
        let pool = NodePool::new(registry());
        assert!(pool.is_empty());

        let first = pool.client(1).unwrap();
        let second = pool.client(1).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pool.chains(), vec![1]);
    }

    #[tokio::test]
    async fn test_pool_from_config_connects_with_payload_logging() {
        let config = crate::GatewayConfigBuilder::new("key", "redis://localhost/")
            .rpc_rate_limit_per_second(5)
            .rpc_log_payloads(true)
            .build();
        let pool = NodePool::from_config(registry(), &config);

        assert!(pool.log_payloads);
        assert!(pool.client(1).is_ok());
    }

    #[test]
    fn test_unknown_chain_is_unsupported() {
        let pool = NodePool::new(registry());
        assert!(matches!(
            pool.client(999_999),
            Err(RpcError::UnsupportedChain { chain_id: 999_999 })
        ));
    }

    #[test]
    fn test_chain_without_usable_endpoint() {
        let pool = NodePool::new(registry());
        assert!(matches!(
            pool.client(5000),
            Err(RpcError::NoEndpoint { chain_id: 5000 })
        ));
    }

    #[tokio::test]
    async fn test_insert_and_remove() {
        let pool = NodePool::new(registry());
        let node = pool.client(1).unwrap();

        pool.insert(10, node);
        assert!(pool.contains(10));
        assert_eq!(pool.len(), 2);

        assert!(pool.remove(10).is_some());
        assert!(pool.remove(10).is_none());
        assert!(!pool.contains(10));
    }
}

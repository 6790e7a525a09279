//! The gateway context
//!
//! [`Gateway`] owns every shared component: the rate limiter, the cache,
//! both chain registries, the explorer client and the node pool. Build it
//! once at startup and pass it by reference; nothing in the crate keeps
//! global state.
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::{Gateway, GatewayConfig};
//!
//! let config = GatewayConfig::from_env()?;
//! let mut gateway = Gateway::connect(config).await?;
//!
//! gateway.set_chain(1)?;
//! let balance = gateway.explorer().accounts().balance("0xA", None).await?;
//!
//! let quote = gateway.get_gas_price(1, "fast").await?;
//! ```

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use futures::future::try_join;
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheBackend, CacheGateway, RedisBackend};
use crate::config::GatewayConfig;
use crate::errors::{ExplorerError, GatewayError, RpcError, TransactionError};
use crate::explorer::{ExplorerClient, QueryParams};
use crate::gas::GasQuote;
use crate::node::NodePool;
use crate::registry::{ChainRegistry, SelectedChain};
use crate::transaction::{TransactionAssembler, UnsignedTransaction};
use crate::transport::RateLimiter;

/// Shared context for explorer and node access
#[derive(Debug)]
pub struct Gateway {
    config: GatewayConfig,
    limiter: Arc<RateLimiter>,
    cache: CacheGateway,
    explorer_registry: Arc<ChainRegistry>,
    rpc_registry: Arc<ChainRegistry>,
    explorer: ExplorerClient,
    assembler: TransactionAssembler,
}

impl Gateway {
    /// Builds a gateway caching in the Redis instance at `config.redis_url`.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an unreachable Redis, or when a
    /// registry has neither a local snapshot nor a reachable source.
    pub async fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let backend = RedisBackend::connect(&config.redis_url).await?;
        Self::with_backend(config, Arc::new(backend)).await
    }

    /// Builds a gateway over an arbitrary cache backend.
    pub async fn with_backend(
        config: GatewayConfig,
        backend: Arc<dyn CacheBackend>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_calls,
            config.rate_limit_period,
        )?);

        let cache = CacheGateway::new(backend);
        cache.initialize().await?;

        let http = reqwest::Client::new();
        let explorer_registry = Arc::new(ChainRegistry::explorer(&config, http.clone()));
        let rpc_registry = Arc::new(ChainRegistry::rpc(&config, http.clone()));
        try_join(
            explorer_registry.ensure_loaded(),
            rpc_registry.ensure_loaded(),
        )
        .await?;

        let explorer = ExplorerClient::new(
            explorer_registry.clone(),
            limiter.clone(),
            cache.clone(),
            config.explorer_api_key.clone(),
        )
        .with_http_client(http)
        .with_cache_ttl(config.cache_ttl)
        .with_timeout(config.http_timeout);

        let pool = Arc::new(NodePool::from_config(rpc_registry.clone(), &config));
        let assembler = TransactionAssembler::new(pool);

        info!(
            cache = cache.backend_name(),
            explorer_chains = explorer_registry.len(),
            rpc_chains = rpc_registry.len(),
            rate_limit_calls = config.rate_limit_calls,
            rate_limit_period_ms = config.rate_limit_period.as_millis() as u64,
            "Gateway ready"
        );

        Ok(Self {
            config,
            limiter,
            cache,
            explorer_registry,
            rpc_registry,
            explorer,
            assembler,
        })
    }

    /// Selects the chain explorer requests go to.
    pub fn set_chain(&mut self, chain_id: u64) -> Result<&SelectedChain, ExplorerError> {
        self.explorer.select_chain(chain_id)
    }

    /// Raw explorer call on the selected chain; see [`ExplorerClient::request`].
    pub async fn request(
        &self,
        module: &str,
        action: &str,
        params: QueryParams,
    ) -> Result<Value, ExplorerError> {
        self.explorer.request(module, action, params).await
    }

    /// See [`TransactionAssembler::assemble`].
    pub async fn assemble_transaction(
        &self,
        chain_id: u64,
        from: Address,
        to: Address,
        value: U256,
        data: Bytes,
        gas_level: &str,
    ) -> Result<UnsignedTransaction, TransactionError> {
        self.assembler
            .assemble(chain_id, from, to, value, data, gas_level)
            .await
    }

    /// See [`TransactionAssembler::get_gas_price`].
    pub async fn get_gas_price(
        &self,
        chain_id: u64,
        gas_level: &str,
    ) -> Result<GasQuote, TransactionError> {
        self.assembler.get_gas_price(chain_id, gas_level).await
    }

    pub async fn send_raw_transaction(
        &self,
        chain_id: u64,
        raw: &[u8],
    ) -> Result<TxHash, RpcError> {
        self.assembler.send_raw_transaction(chain_id, raw).await
    }

    pub async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Option<Value>, RpcError> {
        self.assembler
            .get_transaction_receipt(chain_id, tx_hash)
            .await
    }

    pub async fn wait_for_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Value, RpcError> {
        self.assembler
            .wait_for_transaction_receipt(chain_id, tx_hash)
            .await
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn explorer(&self) -> &ExplorerClient {
        &self.explorer
    }

    pub fn assembler(&self) -> &TransactionAssembler {
        &self.assembler
    }

    pub fn node_pool(&self) -> &Arc<NodePool> {
        self.assembler.pool()
    }

    pub fn cache(&self) -> &CacheGateway {
        &self.cache
    }

    /// The limiter shared by every explorer request
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn explorer_registry(&self) -> &Arc<ChainRegistry> {
        &self.explorer_registry
    }

    pub fn rpc_registry(&self) -> &Arc<ChainRegistry> {
        &self.rpc_registry
    }
}

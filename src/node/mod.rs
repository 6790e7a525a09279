// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Node JSON-RPC access
//!
//! [`NodeClient`] is the narrow set of node calls the gas estimator and the
//! transaction assembler need. [`AlloyNodeClient`] implements it over an
//! Alloy `RootProvider`; tests substitute their own implementation.
//!
//! [`NodePool`] resolves and caches one client per chain id, using the first
//! usable HTTP endpoint from the RPC registry.
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::node::{NodePool, NodeClient};
//!
//! let pool = NodePool::new(rpc_registry).with_rate_limit(Some(10));
//! let node = pool.client(1)?;
//! let gas_price = node.gas_price().await?;
//! ```

use alloy_eips::BlockNumberOrTag;
use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::RpcError;

mod config;
mod factory;
mod pool;

pub use config::NodeConfig;
pub use factory::connect_http;
pub use pool::{NodePool, PooledNode};

/// Node calls used for gas pricing and transaction assembly
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Nonce of `address` at the latest block.
    async fn transaction_count(&self, address: Address) -> Result<u64, RpcError>;

    /// Gas units `request` would consume.
    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, RpcError>;

    /// Base fee of the pending block; `None` on chains without a fee market.
    async fn pending_base_fee(&self) -> Result<Option<u128>, RpcError>;

    /// Priority fee samples at `percentiles` over the last `block_count`
    /// blocks up to the pending one, one row per block.
    async fn fee_history_rewards(
        &self,
        block_count: u64,
        percentiles: &[f64],
    ) -> Result<Option<Vec<Vec<u128>>>, RpcError>;

    /// Legacy gas price.
    async fn gas_price(&self) -> Result<u128, RpcError>;

    /// Broadcasts a signed transaction.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, RpcError>;

    /// Receipt of `tx_hash`, or `None` while it is pending or unknown.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Value>, RpcError>;
}

/// [`NodeClient`] over an Alloy provider
#[derive(Debug, Clone)]
pub struct AlloyNodeClient {
    chain_id: u64,
    provider: RootProvider<Ethereum>,
}

impl AlloyNodeClient {
    pub fn new(chain_id: u64, provider: RootProvider<Ethereum>) -> Self {
        Self { chain_id, provider }
    }

    /// Connects with `config`.
    pub fn connect(chain_id: u64, config: &NodeConfig) -> Result<Self, RpcError> {
        Ok(Self::new(chain_id, connect_http(config)?))
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &RootProvider<Ethereum> {
        &self.provider
    }
}

#[async_trait]
impl NodeClient for AlloyNodeClient {
    async fn transaction_count(&self, address: Address) -> Result<u64, RpcError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| RpcError::call_failed("eth_getTransactionCount", e))
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, RpcError> {
        self.provider
            .estimate_gas(request.clone())
            .await
            .map_err(|e| RpcError::call_failed("eth_estimateGas", e))
    }

    async fn pending_base_fee(&self) -> Result<Option<u128>, RpcError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Pending)
            .await
            .map_err(|e| RpcError::call_failed("eth_getBlockByNumber", e))?;
        Ok(block.and_then(|block| block.header.base_fee_per_gas.map(u128::from)))
    }

    async fn fee_history_rewards(
        &self,
        block_count: u64,
        percentiles: &[f64],
    ) -> Result<Option<Vec<Vec<u128>>>, RpcError> {
        let history = self
            .provider
            .get_fee_history(block_count, BlockNumberOrTag::Pending, percentiles)
            .await
            .map_err(|e| RpcError::call_failed("eth_feeHistory", e))?;
        Ok(history.reward)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| RpcError::call_failed("eth_gasPrice", e))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, RpcError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| RpcError::call_failed("eth_sendRawTransaction", e))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Value>, RpcError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| RpcError::call_failed("eth_getTransactionReceipt", e))?;
        receipt
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RpcError::call_failed("eth_getTransactionReceipt", e))
    }
}

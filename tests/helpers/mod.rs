// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for chaingate integration tests
//!
//! Provides a scripted [`NodeClient`] and fixtures for explorer and RPC
//! registries so tests run without real chains or explorer accounts.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, TxHash, B256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use chaingate::cache::{CacheGateway, MemoryBackend};
use chaingate::errors::RpcError;
use chaingate::{ChainRegistry, ExplorerClient, NodeClient, RateLimiter};
use serde_json::{json, Value};

pub const API_KEY: &str = "TESTKEY";

/// Installs a log subscriber honoring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scripted node for gas and assembly tests
///
/// Every answer is fixed at construction; calls are recorded so tests can
/// check what was asked.
///
/// # Example
///
/// ```rust,ignore
/// let node = MockNode::new()
///     .with_base_fee(Some(10))
///     .with_rewards(Some(vec![vec![1, 2], vec![3, 4]]));
/// pool.insert(1, Arc::new(node));
/// ```
pub struct MockNode {
    base_fee: Option<u128>,
    rewards: Option<Vec<Vec<u128>>>,
    gas_price: u128,
    nonce: u64,
    gas_estimate: u64,
    fail_fee_history: bool,
    receipts: Mutex<VecDeque<Option<Value>>>,
    requested_percentiles: Mutex<Vec<Vec<f64>>>,
    estimate_requests: Mutex<Vec<TransactionRequest>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockNode {
    /// A fee-market node with base fee 100 gwei-units and no reward samples.
    pub fn new() -> Self {
        Self {
            base_fee: Some(100),
            rewards: None,
            gas_price: 7,
            nonce: 0,
            gas_estimate: 21_000,
            fail_fee_history: false,
            receipts: Mutex::new(VecDeque::new()),
            requested_percentiles: Mutex::new(Vec::new()),
            estimate_requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_base_fee(mut self, base_fee: Option<u128>) -> Self {
        self.base_fee = base_fee;
        self
    }

    pub fn with_rewards(mut self, rewards: Option<Vec<Vec<u128>>>) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    /// Makes `eth_feeHistory` fail.
    pub fn failing_fee_history(mut self) -> Self {
        self.fail_fee_history = true;
        self
    }

    /// Receipts returned by successive polls; `None` means still pending.
    /// Once exhausted, every poll reports pending.
    pub fn with_receipts(self, receipts: Vec<Option<Value>>) -> Self {
        *self.receipts.lock().unwrap() = receipts.into();
        self
    }

    pub fn requested_percentiles(&self) -> Vec<Vec<f64>> {
        self.requested_percentiles.lock().unwrap().clone()
    }

    pub fn estimate_requests(&self) -> Vec<TransactionRequest> {
        self.estimate_requests.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeClient for MockNode {
    async fn transaction_count(&self, _address: Address) -> Result<u64, RpcError> {
        Ok(self.nonce)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, RpcError> {
        self.estimate_requests.lock().unwrap().push(request.clone());
        Ok(self.gas_estimate)
    }

    async fn pending_base_fee(&self) -> Result<Option<u128>, RpcError> {
        Ok(self.base_fee)
    }

    async fn fee_history_rewards(
        &self,
        _block_count: u64,
        percentiles: &[f64],
    ) -> Result<Option<Vec<Vec<u128>>>, RpcError> {
        self.requested_percentiles
            .lock()
            .unwrap()
            .push(percentiles.to_vec());
        if self.fail_fee_history {
            return Err(RpcError::call_failed(
                "eth_feeHistory",
                std::io::Error::other("node unavailable"),
            ));
        }
        Ok(self.rewards.clone())
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        Ok(self.gas_price)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, RpcError> {
        self.sent.lock().unwrap().push(raw.to_vec());
        Ok(B256::repeat_byte(0xab))
    }

    async fn transaction_receipt(&self, _tx_hash: TxHash) -> Result<Option<Value>, RpcError> {
        Ok(self.receipts.lock().unwrap().pop_front().flatten())
    }
}

/// Explorer chain list entry for `chain_id` served by `base_url`.
pub fn explorer_entry(chain_id: u64, name: &str, base_url: &str) -> Value {
    json!({
        "chainname": name,
        "chainid": chain_id.to_string(),
        "blockexplorer": "https://etherscan.io",
        "apiurl": format!("{base_url}/v2/api?chainid={chain_id}"),
        "status": 1,
        "comment": ""
    })
}

/// Explorer chain list envelope as served by the chainlist endpoint.
pub fn explorer_chainlist(base_url: &str) -> Value {
    json!({
        "comments": "chainlist",
        "totalcount": 2,
        "result": [
            explorer_entry(1, "Ethereum Mainnet", base_url),
            explorer_entry(137, "Polygon Mainnet", base_url),
        ]
    })
}

/// Flat RPC registry with one templated and one public endpoint per chain.
pub fn rpc_registry_entries() -> Value {
    json!([
        {
            "name": "Ethereum Mainnet",
            "chainId": 1,
            "rpc": [
                "wss://mainnet.infura.io/ws/v3/${INFURA_API_KEY}",
                "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
                "https://eth.llamarpc.com"
            ],
            "explorers": [{"name": "etherscan", "url": "https://etherscan.io"}]
        },
        {
            "name": "Mantle",
            "chainId": 5000,
            "rpc": ["https://mantle.infura.io/v3/${INFURA_API_KEY}"],
            "explorers": []
        }
    ])
}

/// Explorer registry preloaded with chains 1 and 137 on `base_url`.
pub fn explorer_registry(base_url: &str) -> Arc<ChainRegistry> {
    let entries = match explorer_chainlist(base_url)["result"].clone() {
        Value::Array(entries) => entries,
        _ => unreachable!(),
    };
    Arc::new(
        ChainRegistry::new("explorer", format!("{base_url}/v2/chainlist"), "unused.json")
            .with_entries(entries),
    )
}

/// Client against `base_url` with a generous limiter and an in-memory cache,
/// chain 1 selected.
pub fn explorer_client(base_url: &str) -> (ExplorerClient, Arc<MemoryBackend>) {
    let limiter = Arc::new(RateLimiter::new(100, Duration::from_secs(1)).unwrap());
    explorer_client_with_limiter(base_url, limiter)
}

pub fn explorer_client_with_limiter(
    base_url: &str,
    limiter: Arc<RateLimiter>,
) -> (ExplorerClient, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let cache = CacheGateway::new(backend.clone());
    let mut client = ExplorerClient::new(explorer_registry(base_url), limiter, cache, API_KEY)
        .with_cache_ttl(Duration::from_secs(60))
        .with_timeout(Duration::from_secs(5));
    client.select_chain(1).unwrap();
    (client, backend)
}

/// `{status, message, result}` success envelope.
pub fn ok_envelope(result: Value) -> Value {
    json!({"status": "1", "message": "OK", "result": result})
}

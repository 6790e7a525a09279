//! Unsigned transaction assembly and broadcast
//!
//! [`TransactionAssembler`] fills in everything a wallet needs before
//! signing: nonce, gas limit and a tiered fee quote. Signing is left to the
//! caller; the signed bytes come back through
//! [`send_raw_transaction`](TransactionAssembler::send_raw_transaction).

use std::sync::Arc;
use std::time::Duration;

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, Instrument};

use crate::config::constants::{DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT};
use crate::errors::{RpcError, TransactionError};
use crate::gas::{GasEstimator, GasLevel, GasQuote};
use crate::node::{NodePool, PooledNode};
use crate::spans;

/// A transaction ready to be signed
///
/// Serializes to the JSON-RPC transaction object shape, with the fee fields
/// of the quote inlined and `data` omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Gas limit
    pub gas: u64,
    #[serde(flatten)]
    pub fee: GasQuote,
}

impl UnsignedTransaction {
    /// The same transaction as an Alloy request, e.g. for a local signer.
    pub fn to_request(&self) -> TransactionRequest {
        let request = candidate_request(
            self.chain_id,
            self.from,
            self.to,
            self.value,
            self.nonce,
            self.data.as_ref(),
        )
        .with_gas_limit(self.gas);

        match self.fee {
            GasQuote::Eip1559 {
                max_priority_fee_per_gas,
                max_fee_per_gas,
            } => request
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas)
                .with_max_fee_per_gas(max_fee_per_gas),
            GasQuote::Legacy { gas_price } => request.with_gas_price(gas_price),
        }
    }
}

/// Assembles, broadcasts and tracks transactions on any pooled chain
#[derive(Debug)]
pub struct TransactionAssembler {
    pool: Arc<NodePool>,
    estimator: GasEstimator,
    poll_interval: Duration,
    receipt_timeout: Duration,
}

impl TransactionAssembler {
    pub fn new(pool: Arc<NodePool>) -> Self {
        Self {
            pool,
            estimator: GasEstimator::default(),
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_estimator(mut self, estimator: GasEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Polling cadence and deadline of
    /// [`wait_for_transaction_receipt`](Self::wait_for_transaction_receipt).
    #[must_use]
    pub fn with_receipt_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.receipt_timeout = timeout;
        self
    }

    pub fn pool(&self) -> &Arc<NodePool> {
        &self.pool
    }

    /// Fee quote for `level` on `chain_id`.
    ///
    /// # Errors
    ///
    /// The level is checked before any node is contacted, so an unknown
    /// level fails with [`GasError::UnsupportedLevel`](crate::errors::GasError::UnsupportedLevel)
    /// even for an unknown chain.
    pub async fn get_gas_price(
        &self,
        chain_id: u64,
        level: &str,
    ) -> Result<GasQuote, TransactionError> {
        let level: GasLevel = level.parse()?;
        let node = self.pool.client(chain_id)?;
        Ok(self.estimator.quote(node.as_ref(), level).await?)
    }

    /// Builds an unsigned transaction from `from` to `to`.
    ///
    /// Fetches the nonce, estimates gas for the candidate transaction and
    /// prices it at `level`. `data` is only included when non-empty.
    pub async fn assemble(
        &self,
        chain_id: u64,
        from: Address,
        to: Address,
        value: U256,
        data: Bytes,
        level: &str,
    ) -> Result<UnsignedTransaction, TransactionError> {
        let level: GasLevel = level.parse()?;
        let node = self.pool.client(chain_id)?;

        let span = spans::assemble_transaction(chain_id, from, to, level);
        async {
            let nonce = node.transaction_count(from).await?;
            let data = (!data.is_empty()).then_some(data);

            let candidate = candidate_request(chain_id, from, to, value, nonce, data.as_ref());
            let gas = node.estimate_gas(&candidate).await?;
            let fee = self.estimator.quote(node.as_ref(), level).await?;

            debug!(nonce, gas, max_fee = fee.max_fee_per_gas(), "Assembled transaction");
            Ok::<_, TransactionError>(UnsignedTransaction {
                from,
                to,
                value,
                nonce,
                chain_id,
                data,
                gas,
                fee,
            })
        }
        .instrument(span)
        .await
    }

    /// Broadcasts signed transaction bytes.
    pub async fn send_raw_transaction(
        &self,
        chain_id: u64,
        raw: &[u8],
    ) -> Result<TxHash, RpcError> {
        let node = self.pool.client(chain_id)?;
        let tx_hash = node.send_raw_transaction(raw).await?;
        info!(chain_id, %tx_hash, "Broadcast transaction");
        Ok(tx_hash)
    }

    /// Receipt of `tx_hash`, or `None` if it is not mined yet.
    pub async fn get_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Option<Value>, RpcError> {
        let node = self.pool.client(chain_id)?;
        node.transaction_receipt(tx_hash).await
    }

    /// Polls until `tx_hash` has a receipt.
    ///
    /// # Errors
    ///
    /// [`RpcError::ReceiptTimeout`] once the configured timeout elapses.
    pub async fn wait_for_transaction_receipt(
        &self,
        chain_id: u64,
        tx_hash: TxHash,
    ) -> Result<Value, RpcError> {
        let node = self.pool.client(chain_id)?;
        self.poll_receipt(&node, tx_hash).await
    }

    async fn poll_receipt(&self, node: &PooledNode, tx_hash: TxHash) -> Result<Value, RpcError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = node.transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            let waited = started.elapsed();
            if waited >= self.receipt_timeout {
                return Err(RpcError::ReceiptTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited,
                });
            }
            let remaining = self.receipt_timeout - waited;
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }
}

fn candidate_request(
    chain_id: u64,
    from: Address,
    to: Address,
    value: U256,
    nonce: u64,
    data: Option<&Bytes>,
) -> TransactionRequest {
    let request = TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
        .with_nonce(nonce)
        .with_chain_id(chain_id);
    match data {
        Some(data) => request.with_input(data.clone()),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};
    use serde_json::json;

    fn unsigned(data: Option<Bytes>, fee: GasQuote) -> UnsignedTransaction {
        UnsignedTransaction {
            from: address!("0x1111111111111111111111111111111111111111"),
            to: address!("0x2222222222222222222222222222222222222222"),
            value: U256::from(1_000u64),
            nonce: 7,
            chain_id: 1,
            data,
            gas: 21_000,
            fee,
        }
    }

    #[test]
    fn test_serializes_without_empty_data() {
        let tx = unsigned(None, GasQuote::Legacy { gas_price: 5 });
        let value = serde_json::to_value(&tx).unwrap();

        assert!(value.get("data").is_none());
        assert_eq!(value["gasPrice"], json!(5));
        assert_eq!(value["chainId"], json!(1));
        assert_eq!(value["nonce"], json!(7));
        assert_eq!(value["gas"], json!(21_000));
        assert!(value.get("maxFeePerGas").is_none());
    }

    #[test]
    fn test_serializes_fee_market_fields_and_data() {
        let tx = unsigned(
            Some(bytes!("a9059cbb")),
            GasQuote::Eip1559 {
                max_priority_fee_per_gas: 2,
                max_fee_per_gas: 42,
            },
        );
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["data"], json!("0xa9059cbb"));
        assert_eq!(value["maxPriorityFeePerGas"], json!(2));
        assert_eq!(value["maxFeePerGas"], json!(42));
    }

    #[test]
    fn test_to_request_carries_fees() {
        let tx = unsigned(
            None,
            GasQuote::Eip1559 {
                max_priority_fee_per_gas: 2,
                max_fee_per_gas: 42,
            },
        );
        let request = tx.to_request();

        assert_eq!(request.nonce, Some(7));
        assert_eq!(request.gas, Some(21_000));
        assert_eq!(request.max_fee_per_gas, Some(42));
        assert_eq!(request.max_priority_fee_per_gas, Some(2));
        assert_eq!(request.gas_price, None);
        assert_eq!(request.chain_id, Some(1));
    }
}

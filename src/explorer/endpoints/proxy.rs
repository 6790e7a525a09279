use serde_json::Value;

use super::tag_or_latest;
use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, QueryParams};

const MODULE: &str = "proxy";

/// Arguments of `eth_estimateGas`; numbers are hex strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateGasRequest {
    pub to: String,
    pub data: String,
    pub value: Option<String>,
    pub gas: Option<String>,
    pub gas_price: Option<String>,
}

impl EstimateGasRequest {
    fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("to", self.to.as_str())
            .with("data", self.data.as_str())
            .with_opt("value", self.value.as_deref())
            .with_opt("gas", self.gas.as_deref())
            .with_opt("gasPrice", self.gas_price.as_deref())
    }
}

/// `module=proxy` endpoints: node JSON-RPC methods answered by the explorer
///
/// Results come back as the JSON-RPC `result`, usually hex strings.
#[derive(Debug, Clone, Copy)]
pub struct Proxy<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Proxy<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    pub async fn block_number(&self) -> Result<Value, ExplorerError> {
        self.client
            .request(MODULE, "eth_blockNumber", QueryParams::new())
            .await
    }

    /// Block `tag`; `full` includes transaction objects instead of hashes.
    pub async fn block_by_number(&self, tag: &str, full: bool) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("tag", tag)
            .with("boolean", if full { "true" } else { "false" });
        self.client
            .request(MODULE, "eth_getBlockByNumber", params)
            .await
    }

    pub async fn uncle_by_block_number_and_index(
        &self,
        tag: &str,
        index: &str,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("tag", tag).with("index", index);
        self.client
            .request(MODULE, "eth_getUncleByBlockNumberAndIndex", params)
            .await
    }

    pub async fn block_transaction_count_by_number(
        &self,
        tag: &str,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("tag", tag);
        self.client
            .request(MODULE, "eth_getBlockTransactionCountByNumber", params)
            .await
    }

    pub async fn transaction_by_hash(&self, tx_hash: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("txhash", tx_hash);
        self.client
            .request(MODULE, "eth_getTransactionByHash", params)
            .await
    }

    pub async fn transaction_by_block_number_and_index(
        &self,
        tag: &str,
        index: &str,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("tag", tag).with("index", index);
        self.client
            .request(MODULE, "eth_getTransactionByBlockNumberAndIndex", params)
            .await
    }

    /// Nonce of `address` at `tag` (default `latest`).
    pub async fn transaction_count(
        &self,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("tag", tag_or_latest(tag));
        self.client
            .request(MODULE, "eth_getTransactionCount", params)
            .await
    }

    /// Broadcasts a signed transaction. Never cached.
    pub async fn send_raw_transaction(&self, hex: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("hex", hex);
        self.client
            .request(MODULE, "eth_sendRawTransaction", params)
            .await
    }

    pub async fn transaction_receipt(&self, tx_hash: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("txhash", tx_hash);
        self.client
            .request(MODULE, "eth_getTransactionReceipt", params)
            .await
    }

    /// Read-only message call against `to`.
    pub async fn call(
        &self,
        to: &str,
        data: &str,
        tag: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("to", to)
            .with("data", data)
            .with("tag", tag_or_latest(tag));
        self.client.request(MODULE, "eth_call", params).await
    }

    pub async fn code(&self, address: &str, tag: Option<&str>) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("tag", tag_or_latest(tag));
        self.client.request(MODULE, "eth_getCode", params).await
    }

    pub async fn storage_at(
        &self,
        address: &str,
        position: &str,
        tag: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("position", position)
            .with("tag", tag_or_latest(tag));
        self.client.request(MODULE, "eth_getStorageAt", params).await
    }

    pub async fn gas_price(&self) -> Result<Value, ExplorerError> {
        self.client
            .request(MODULE, "eth_gasPrice", QueryParams::new())
            .await
    }

    pub async fn estimate_gas(
        &self,
        request: &EstimateGasRequest,
    ) -> Result<Value, ExplorerError> {
        self.client
            .request(MODULE, "eth_estimateGas", request.params())
            .await
    }
}

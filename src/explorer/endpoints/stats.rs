use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{DateRange, ExplorerClient, QueryParams};

const MODULE: &str = "stats";

/// `module=stats` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Stats<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Stats<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Total native supply in wei.
    pub async fn eth_supply(&self) -> Result<Value, ExplorerError> {
        self.plain("ethsupply").await
    }

    /// Supply including staking rewards, burnt fees and withdrawals.
    pub async fn eth_supply2(&self) -> Result<Value, ExplorerError> {
        self.plain("ethsupply2").await
    }

    /// Latest native token price.
    pub async fn eth_price(&self) -> Result<Value, ExplorerError> {
        self.plain("ethprice").await
    }

    pub async fn node_count(&self) -> Result<Value, ExplorerError> {
        self.plain("nodecount").await
    }

    /// Chain size per day. Client type defaults to `geth`, sync mode to
    /// `default`.
    pub async fn chain_size(
        &self,
        range: DateRange,
        client_type: Option<&str>,
        sync_mode: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = range.apply(
            QueryParams::new()
                .with("clienttype", client_type.unwrap_or("geth"))
                .with("syncmode", sync_mode.unwrap_or("default")),
        );
        self.client.request(MODULE, "chainsize", params).await
    }

    pub async fn daily_tx_fee(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailytxnfee", range).await
    }

    pub async fn daily_new_address(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailynewaddress", range).await
    }

    pub async fn daily_network_utilization(
        &self,
        range: DateRange,
    ) -> Result<Value, ExplorerError> {
        self.daily("dailynetutilization", range).await
    }

    pub async fn daily_avg_hashrate(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyavghashrate", range).await
    }

    pub async fn daily_tx_count(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailytx", range).await
    }

    pub async fn daily_avg_network_difficulty(
        &self,
        range: DateRange,
    ) -> Result<Value, ExplorerError> {
        self.daily("dailyavgnetdifficulty", range).await
    }

    pub async fn daily_market_cap(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("ethdailymarketcap", range).await
    }

    pub async fn daily_price(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("ethdailyprice", range).await
    }

    async fn plain(&self, action: &str) -> Result<Value, ExplorerError> {
        self.client.request(MODULE, action, QueryParams::new()).await
    }

    async fn daily(&self, action: &str, range: DateRange) -> Result<Value, ExplorerError> {
        self.client
            .request(MODULE, action, range.apply(QueryParams::new()))
            .await
    }
}

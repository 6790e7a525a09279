use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{Closest, DateRange, ExplorerClient, QueryParams};

/// `module=block` endpoints plus the daily block statistics
#[derive(Debug, Clone, Copy)]
pub struct Blocks<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Block and uncle rewards of `block_number`.
    pub async fn block_reward(&self, block_number: u64) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("blockno", block_number);
        self.client.request("block", "getblockreward", params).await
    }

    /// Estimated time until `block_number` is mined.
    pub async fn block_countdown(&self, block_number: u64) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("blockno", block_number);
        self.client.request("block", "getblockcountdown", params).await
    }

    /// Block mined closest to a unix `timestamp`.
    pub async fn block_number_by_time(
        &self,
        timestamp: u64,
        closest: Closest,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("timestamp", timestamp)
            .with("closest", closest.as_str());
        self.client.request("block", "getblocknobytime", params).await
    }

    pub async fn daily_avg_block_size(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyavgblocksize", range).await
    }

    pub async fn daily_block_count(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyblkcount", range).await
    }

    pub async fn daily_block_rewards(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyblockrewards", range).await
    }

    pub async fn daily_avg_block_time(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyavgblocktime", range).await
    }

    pub async fn daily_uncle_block_count(
        &self,
        range: DateRange,
    ) -> Result<Value, ExplorerError> {
        self.daily("dailyuncleblkcount", range).await
    }

    async fn daily(&self, action: &str, range: DateRange) -> Result<Value, ExplorerError> {
        self.client
            .request("stats", action, range.apply(QueryParams::new()))
            .await
    }
}

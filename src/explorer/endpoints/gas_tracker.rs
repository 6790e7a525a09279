use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{DateRange, ExplorerClient, QueryParams};

/// `module=gastracker` endpoints plus the daily gas statistics
#[derive(Debug, Clone, Copy)]
pub struct GasTracker<'a> {
    client: &'a ExplorerClient,
}

impl<'a> GasTracker<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Estimated confirmation time, in seconds, for `gas_price` wei.
    pub async fn estimate(&self, gas_price: u128) -> Result<Value, ExplorerError> {
        // u128 does not fit a JSON number
        let params = QueryParams::new().with("gasprice", gas_price.to_string());
        self.client.request("gastracker", "gasestimate", params).await
    }

    /// Safe, proposed and fast gas prices.
    pub async fn oracle(&self) -> Result<Value, ExplorerError> {
        self.client
            .request("gastracker", "gasoracle", QueryParams::new())
            .await
    }

    pub async fn daily_avg_gas_limit(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyavggaslimit", range).await
    }

    pub async fn daily_gas_used(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailygasused", range).await
    }

    pub async fn daily_avg_gas_price(&self, range: DateRange) -> Result<Value, ExplorerError> {
        self.daily("dailyavggasprice", range).await
    }

    async fn daily(&self, action: &str, range: DateRange) -> Result<Value, ExplorerError> {
        self.client
            .request("stats", action, range.apply(QueryParams::new()))
            .await
    }
}

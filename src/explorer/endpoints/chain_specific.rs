use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, Page, QueryParams};

/// Endpoints only some chains serve
#[derive(Debug, Clone, Copy)]
pub struct ChainSpecific<'a> {
    client: &'a ExplorerClient,
}

impl<'a> ChainSpecific<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Deposits and withdrawals of `address` through the chain's native
    /// bridge.
    pub async fn bridge_transactions(
        &self,
        address: &str,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("page", page.page)
            .with("offset", page.offset);
        self.client.request("account", "txnbridge", params).await
    }
}

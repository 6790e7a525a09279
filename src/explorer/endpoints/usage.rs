use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, QueryParams};
use crate::registry::ChainInfo;

/// API usage and supported chains
#[derive(Debug, Clone, Copy)]
pub struct Usage<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Usage<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Credits used and remaining for the configured API key.
    pub async fn api_limit(&self) -> Result<Value, ExplorerError> {
        self.client
            .request("getapilimit", "getapilimit", QueryParams::new())
            .await
    }

    /// Chains the explorer currently supports.
    ///
    /// Re-fetches the chain list (updating the local snapshot) and returns
    /// its typed view.
    pub async fn chain_list(&self) -> Result<Vec<ChainInfo>, ExplorerError> {
        let registry = self.client.registry();
        registry.refresh().await?;
        Ok(registry.chains())
    }
}

use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, QueryParams};

const MODULE: &str = "transaction";

/// `module=transaction` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Transactions<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Transactions<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Execution status (`isError`, `errDescription`) of a transaction.
    pub async fn status(&self, tx_hash: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("txhash", tx_hash);
        self.client.request(MODULE, "getstatus", params).await
    }

    /// Receipt status of a post-Byzantium transaction.
    pub async fn receipt_status(&self, tx_hash: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("txhash", tx_hash);
        self.client.request(MODULE, "gettxreceiptstatus", params).await
    }
}

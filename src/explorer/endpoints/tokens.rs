use serde_json::Value;

use super::tag_or_latest;
use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, Page, QueryParams};

/// Token endpoints, spread over the `account`, `stats` and `token` modules
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// ERC-20 balance of `address` in `contract_address`.
    pub async fn balance(
        &self,
        contract_address: &str,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("contractaddress", contract_address)
            .with("address", address)
            .with("tag", tag_or_latest(tag));
        self.client.request("account", "tokenbalance", params).await
    }

    /// Historical ERC-20 balance at `block_number`.
    pub async fn balance_history(
        &self,
        contract_address: &str,
        address: &str,
        block_number: u64,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("contractaddress", contract_address)
            .with("address", address)
            .with("blockno", block_number);
        self.client
            .request("account", "tokenbalancehistory", params)
            .await
    }

    /// Total supply of an ERC-20 token.
    pub async fn supply(&self, contract_address: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("contractaddress", contract_address);
        self.client.request("stats", "tokensupply", params).await
    }

    /// Total supply at `block_number`.
    pub async fn supply_history(
        &self,
        contract_address: &str,
        block_number: u64,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("contractaddress", contract_address)
            .with("blockno", block_number);
        self.client
            .request("stats", "tokensupplyhistory", params)
            .await
    }

    pub async fn holder_list(
        &self,
        contract_address: &str,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("contractaddress", contract_address)
            .with("page", page.page)
            .with("offset", page.offset);
        self.client.request("token", "tokenholderlist", params).await
    }

    /// Project metadata of a token.
    pub async fn info(&self, contract_address: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("contractaddress", contract_address);
        self.client.request("token", "tokeninfo", params).await
    }

    /// ERC-20 holdings of `address`.
    pub async fn address_token_balance(
        &self,
        address: &str,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        self.holdings("addresstokenbalance", address, None, page)
            .await
    }

    /// ERC-721 holdings of `address`, grouped by collection.
    pub async fn address_nft_balance(
        &self,
        address: &str,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        self.holdings("addresstokennftbalance", address, None, page)
            .await
    }

    /// Individual ERC-721 tokens of `address` in one collection.
    pub async fn address_nft_inventory(
        &self,
        address: &str,
        contract_address: &str,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        self.holdings(
            "addresstokennftinventory",
            address,
            Some(contract_address),
            page,
        )
        .await
    }

    async fn holdings(
        &self,
        action: &str,
        address: &str,
        contract_address: Option<&str>,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with_opt("contractaddress", contract_address)
            .with("page", page.page)
            .with("offset", page.offset);
        self.client.request("account", action, params).await
    }
}

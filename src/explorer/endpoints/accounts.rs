use serde_json::Value;

use super::tag_or_latest;
use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, ListOptions, Page, QueryParams, Sort};

const MODULE: &str = "account";

/// `module=account` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Native balance of `address` in wei.
    pub async fn balance(&self, address: &str, tag: Option<&str>) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("tag", tag_or_latest(tag));
        self.client.request(MODULE, "balance", params).await
    }

    /// Native balances of several addresses in one call.
    pub async fn balance_multi(
        &self,
        addresses: &[&str],
        tag: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", addresses.join(","))
            .with("tag", tag_or_latest(tag));
        self.client.request(MODULE, "balancemulti", params).await
    }

    /// Historical native balance at block `block_number`.
    pub async fn balance_history(
        &self,
        address: &str,
        block_number: u64,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("blockno", block_number);
        self.client.request(MODULE, "balancehistory", params).await
    }

    /// Normal transactions sent from or to `address`.
    pub async fn tx_list(
        &self,
        address: &str,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        let params = options.apply(QueryParams::new().with("address", address));
        self.client.request(MODULE, "txlist", params).await
    }

    /// Internal transactions of `address`.
    ///
    /// Without options the newest ten are returned (page 1, offset 10,
    /// descending).
    pub async fn internal_tx_list(
        &self,
        address: &str,
        options: Option<ListOptions>,
    ) -> Result<Value, ExplorerError> {
        let options = options.unwrap_or_else(|| {
            ListOptions::default()
                .page(Page::default())
                .sort(Sort::Desc)
        });
        let params = options.apply(QueryParams::new().with("address", address));
        self.client.request(MODULE, "txlistinternal", params).await
    }

    /// Internal transactions created by transaction `tx_hash`.
    pub async fn internal_tx_by_hash(&self, tx_hash: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("txhash", tx_hash);
        self.client.request(MODULE, "txlistinternal", params).await
    }

    /// ERC-20 transfer events, optionally for one token contract.
    pub async fn token_transfers(
        &self,
        address: &str,
        contract_address: Option<&str>,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        self.transfers("tokentx", address, contract_address, options)
            .await
    }

    /// ERC-721 transfer events, optionally for one token contract.
    pub async fn nft_transfers(
        &self,
        address: &str,
        contract_address: Option<&str>,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        self.transfers("tokennfttx", address, contract_address, options)
            .await
    }

    /// ERC-1155 transfer events, optionally for one token contract.
    pub async fn erc1155_transfers(
        &self,
        address: &str,
        contract_address: Option<&str>,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        self.transfers("token1155tx", address, contract_address, options)
            .await
    }

    /// Beacon chain withdrawals credited to `address`.
    pub async fn beacon_withdrawals(
        &self,
        address: &str,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        let params = options.apply(QueryParams::new().with("address", address));
        self.client.request(MODULE, "txsBeaconWithdrawal", params).await
    }

    /// Blocks validated by `address`. `block_type` is `blocks` (default) or
    /// `uncles`.
    pub async fn mined_blocks(
        &self,
        address: &str,
        block_type: Option<&str>,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with("blocktype", block_type.unwrap_or("blocks"))
            .with("page", page.page)
            .with("offset", page.offset);
        self.client.request(MODULE, "getminedblocks", params).await
    }

    async fn transfers(
        &self,
        action: &str,
        address: &str,
        contract_address: Option<&str>,
        options: ListOptions,
    ) -> Result<Value, ExplorerError> {
        let params = options.apply(
            QueryParams::new()
                .with("address", address)
                .with_opt("contractaddress", contract_address),
        );
        self.client.request(MODULE, action, params).await
    }
}

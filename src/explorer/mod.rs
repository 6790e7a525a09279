//! Block explorer client (Etherscan v2 style)
//!
//! [`ExplorerClient::request`] is the single primitive every endpoint goes
//! through: parameters are filtered against the action's allow-list, a slot
//! is taken from the shared [`RateLimiter`], the cache is consulted, and on a
//! miss the explorer is called and its envelope classified.
//!
//! The endpoint facades ([`Accounts`], [`Contracts`], [`Proxy`], ...) only
//! shape parameters for that primitive.
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::explorer::{ExplorerClient, ListOptions, Sort};
//!
//! let mut client = ExplorerClient::new(registry, limiter, cache, api_key);
//! client.select_chain(1)?;
//!
//! let balance = client.accounts().balance("0xde0B295669a9FD93d5F28D9Ec85E40f4cb697BAe").await?;
//! let txs = client
//!     .accounts()
//!     .tx_list("0xde0B...", ListOptions::default().sort(Sort::Desc))
//!     .await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, Instrument};
use url::Url;

use crate::cache::{explorer_cache_key, CacheGateway};
use crate::config::constants::{
    DEFAULT_CACHE_TTL, DEFAULT_HTTP_TIMEOUT, EXPLORER_CACHE_NAMESPACE,
};
use crate::errors::{redact_url, ExplorerError, RegistryError, TransportError};
use crate::registry::{ChainRegistry, SelectedChain};
use crate::spans;
use crate::transport::RateLimiter;

mod endpoints;
mod params;
mod query;
mod response;

pub use endpoints::{
    Accounts, Blocks, ChainSpecific, Contracts, EstimateGasRequest, GasTracker, LogQuery, Logs,
    Proxy, Stats, TopicOperator, Tokens, Transactions, Usage, VerifySourceRequest,
};
pub use params::{allowed_params, is_cacheable, QueryParams};
pub use query::{BlockRange, Closest, DateRange, ListOptions, Page, Sort};
pub use response::{classify, JSONRPC_VERSION};

/// Client for one explorer API key, serving one selected chain at a time
///
/// The rate limiter and cache are shared handles, so several clients (or a
/// client and a node transport) can draw from the same budget.
#[derive(Debug)]
pub struct ExplorerClient {
    http: reqwest::Client,
    registry: Arc<ChainRegistry>,
    limiter: Arc<RateLimiter>,
    cache: CacheGateway,
    api_key: String,
    cache_ttl: Duration,
    timeout: Duration,
    namespace: String,
    selected: Option<SelectedChain>,
}

impl ExplorerClient {
    /// Creates a client with no chain selected.
    pub fn new(
        registry: Arc<ChainRegistry>,
        limiter: Arc<RateLimiter>,
        cache: CacheGateway,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            registry,
            limiter,
            cache,
            api_key: api_key.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            timeout: DEFAULT_HTTP_TIMEOUT,
            namespace: EXPLORER_CACHE_NAMESPACE.to_string(),
            selected: None,
        }
    }

    /// Uses a shared HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Sets how long successful responses are cached; zero disables expiry.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the cache key namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Selects the chain subsequent requests go to.
    ///
    /// The chain must be in the explorer registry and have an API URL.
    pub fn select_chain(&mut self, chain_id: u64) -> Result<&SelectedChain, ExplorerError> {
        let selected = self.registry.select(chain_id)?;
        self.registry.value_for(Some(&selected), "apiurl")?;

        debug!(
            chain_id,
            chain_name = selected.name().unwrap_or_default(),
            "Explorer chain selected"
        );
        let selected = &*self.selected.insert(selected);
        Ok(selected)
    }

    /// The selected chain, if any
    pub fn selected_chain(&self) -> Option<&SelectedChain> {
        self.selected.as_ref()
    }

    /// Id of the selected chain, if any
    pub fn chain_id(&self) -> Option<u64> {
        self.selected.as_ref().map(SelectedChain::chain_id)
    }

    /// The explorer chain registry
    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    /// The response cache
    pub fn cache(&self) -> &CacheGateway {
        &self.cache
    }

    /// Calls `module`/`action` on the selected chain.
    ///
    /// Keys not allowed for `action` are dropped. Successful payloads are
    /// cached under a key derived from the chain, module, action and the
    /// filtered parameters, except for actions with upstream side effects.
    ///
    /// # Errors
    ///
    /// - [`ExplorerError::NoChainSelected`] before [`select_chain`](Self::select_chain)
    /// - [`ExplorerError::UnknownAction`] for actions without an allow-list
    /// - [`ExplorerError::Transport`] for network failures and non-200 statuses
    /// - [`ExplorerError::Upstream`] / [`ExplorerError::ProtocolVersion`] for
    ///   failures reported in the body
    /// - [`ExplorerError::Cache`] when the cache backend fails
    pub async fn request(
        &self,
        module: &str,
        action: &str,
        params: QueryParams,
    ) -> Result<Value, ExplorerError> {
        let selected = self
            .selected
            .as_ref()
            .ok_or(ExplorerError::NoChainSelected)?;
        let allowed = allowed_params(action).ok_or_else(|| ExplorerError::UnknownAction {
            action: action.to_string(),
        })?;
        let params = params.retain_allowed(allowed);
        let chain_id = selected.chain_id();

        let span = spans::explorer_request(chain_id, module, action);
        async {
            self.limiter.acquire().await;

            let cacheable = is_cacheable(action);
            let key = explorer_cache_key(
                &self.namespace,
                chain_id,
                module,
                action,
                params.as_map(),
            );
            if cacheable {
                if let Some(hit) = self.cache.get::<Value>(&key).await? {
                    return Ok(hit);
                }
            }

            let url = self.build_url(selected, module, action, &params)?;
            let payload = self.fetch(&url).await?;

            if cacheable {
                self.cache.set(&key, &payload, self.cache_ttl).await?;
            }
            Ok::<_, ExplorerError>(payload)
        }
        .instrument(span)
        .await
    }

    /// Removes every cached response of the selected chain.
    pub async fn invalidate_chain(&self) -> Result<u64, ExplorerError> {
        let chain_id = self.chain_id().ok_or(ExplorerError::NoChainSelected)?;
        let prefix = format!("{}:{chain_id}:", self.namespace);
        Ok(self.cache.clear_prefix(&prefix).await?)
    }

    /// Account endpoints
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    /// Contract endpoints
    pub fn contracts(&self) -> Contracts<'_> {
        Contracts::new(self)
    }

    /// Transaction status endpoints
    pub fn transactions(&self) -> Transactions<'_> {
        Transactions::new(self)
    }

    /// Block endpoints
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(self)
    }

    /// Event log endpoints
    pub fn logs(&self) -> Logs<'_> {
        Logs::new(self)
    }

    /// JSON-RPC passthrough endpoints
    pub fn proxy(&self) -> Proxy<'_> {
        Proxy::new(self)
    }

    /// Token endpoints
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self)
    }

    /// Gas tracker endpoints
    pub fn gas_tracker(&self) -> GasTracker<'_> {
        GasTracker::new(self)
    }

    /// Chain statistics endpoints
    pub fn stats(&self) -> Stats<'_> {
        Stats::new(self)
    }

    /// Endpoints that only exist on some chains
    pub fn chain_specific(&self) -> ChainSpecific<'_> {
        ChainSpecific::new(self)
    }

    /// API usage and chain list endpoints
    pub fn usage(&self) -> Usage<'_> {
        Usage::new(self)
    }

    fn build_url(
        &self,
        selected: &SelectedChain,
        module: &str,
        action: &str,
        params: &QueryParams,
    ) -> Result<Url, ExplorerError> {
        let chain_id = selected.chain_id();
        let base = selected
            .api_url()
            .ok_or_else(|| RegistryError::FieldMissing {
                chain_id,
                key: "apiurl".to_string(),
            })?;
        let mut url =
            Url::parse(base).map_err(|source| ExplorerError::InvalidBaseUrl { chain_id, source })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("apikey", &self.api_key)
                .append_pair("module", module)
                .append_pair("action", action);
            for (key, value) in params.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    async fn fetch(&self, url: &Url) -> Result<Value, ExplorerError> {
        debug!(url = %redact_url(url.as_str()), "Requesting explorer");

        let response = self
            .http
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_send(url.as_str(), self.timeout, e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TransportError::status(url.as_str(), status.as_u16()).into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::body(url.as_str(), e))?;
        classify(body)
    }
}

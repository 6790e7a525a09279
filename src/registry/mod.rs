//! Chain registries backed by a remote list and a local snapshot
//!
//! A [`ChainRegistry`] holds the raw entries of one chain list. Two are used
//! by the gateway:
//!
//! - the explorer chain list (`chainid`, `chainname`, `apiurl`), served as a
//!   `{ totalcount, result: [...] }` envelope
//! - the RPC registry (`chainId`, `name`, `rpc`, `explorers`), served as a
//!   flat list
//!
//! Both shapes are accepted by the same code. The snapshot is swapped
//! atomically on refresh, so readers always see a complete list.
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::ChainRegistry;
//!
//! let registry = ChainRegistry::new("rpc", "https://chainid.network/chains.json", "data/chains.json")
//!     .with_api_key("infura-project");
//! registry.ensure_loaded().await?;
//!
//! let selected = registry.select(1)?;
//! let urls = registry.value_for(Some(&selected), "rpc")?;
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, Instrument};

use crate::config::constants::DEFAULT_HTTP_TIMEOUT;
use crate::config::GatewayConfig;
use crate::errors::{RegistryError, TransportError};
use crate::spans;

mod chain;

pub use chain::ChainInfo;
use chain::{entry_chain_id, substitute_api_key};

/// The entry chosen by [`ChainRegistry::select`]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedChain {
    chain_id: u64,
    entry: Arc<Map<String, Value>>,
}

impl SelectedChain {
    /// Numeric chain id
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Raw field of the entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entry.get(key)
    }

    /// The whole raw entry
    pub fn entry(&self) -> &Map<String, Value> {
        &self.entry
    }

    /// `chainname` or `name`, whichever the entry has
    pub fn name(&self) -> Option<&str> {
        self.get("chainname")
            .or_else(|| self.get("name"))
            .and_then(Value::as_str)
    }

    /// The explorer API base URL (`apiurl`)
    pub fn api_url(&self) -> Option<&str> {
        self.get("apiurl").and_then(Value::as_str)
    }
}

/// A chain list with lookup by chain id
///
/// Lookups are synchronous and memoized per chain id; [`refresh`](Self::refresh)
/// and [`load_local_snapshot`](Self::load_local_snapshot) replace the whole
/// list and drop the memo.
#[derive(Debug)]
pub struct ChainRegistry {
    label: &'static str,
    source_url: String,
    snapshot_path: PathBuf,
    http: reqwest::Client,
    timeout: Duration,
    api_key: Option<String>,
    entries: RwLock<Arc<Vec<Value>>>,
    selections: RwLock<HashMap<u64, SelectedChain>>,
}

impl ChainRegistry {
    /// Creates an empty registry for `source_url`, persisted at `snapshot_path`.
    ///
    /// `label` only tags log lines (e.g. `"explorer"`, `"rpc"`).
    pub fn new(
        label: &'static str,
        source_url: impl Into<String>,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            label,
            source_url: source_url.into(),
            snapshot_path: snapshot_path.into(),
            http: reqwest::Client::new(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            api_key: None,
            entries: RwLock::new(Arc::new(Vec::new())),
            selections: RwLock::new(HashMap::new()),
        }
    }

    /// The explorer chain list described by `config`.
    pub fn explorer(config: &GatewayConfig, http: reqwest::Client) -> Self {
        Self::new(
            "explorer",
            &config.explorer_chainlist_url,
            config.explorer_snapshot_path(),
        )
        .with_http_client(http)
        .with_timeout(config.http_timeout)
    }

    /// The RPC registry described by `config`, with the project id
    /// substituted into RPC URLs.
    pub fn rpc(config: &GatewayConfig, http: reqwest::Client) -> Self {
        let registry = Self::new("rpc", &config.rpc_registry_url, config.rpc_snapshot_path())
            .with_http_client(http)
            .with_timeout(config.http_timeout);
        match &config.rpc_project_id {
            Some(project_id) => registry.with_api_key(project_id),
            None => registry,
        }
    }

    /// Uses a shared HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the key substituted for the RPC URL placeholder.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Seeds the registry with in-memory entries.
    #[must_use]
    pub fn with_entries(self, entries: Vec<Value>) -> Self {
        self.replace(entries);
        self
    }

    /// Source URL of the remote list
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Location of the local snapshot
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Number of entries in the current snapshot
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether no list has been loaded
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Downloads the remote list, persists it, and swaps it in.
    ///
    /// Returns the number of entries loaded.
    pub async fn refresh(&self) -> Result<usize, RegistryError> {
        let span = spans::registry_refresh(self.label, &self.source_url);
        async {
            let response = self
                .http
                .get(&self.source_url)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| TransportError::from_send(&self.source_url, self.timeout, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::status(&self.source_url, status.as_u16()).into());
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| TransportError::body(&self.source_url, e))?;
            let entries = parse_entries(body)?;

            self.persist(&entries).await?;
            let count = entries.len();
            self.replace(entries);

            info!(
                registry = self.label,
                chains = count,
                "Chain registry refreshed"
            );
            Ok::<_, RegistryError>(count)
        }
        .instrument(span)
        .await
    }

    /// Loads the local snapshot if one exists.
    ///
    /// Returns `Ok(false)` when there is no snapshot file.
    pub async fn load_local_snapshot(&self) -> Result<bool, RegistryError> {
        let bytes = match tokio::fs::read(&self.snapshot_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(registry = self.label, path = %self.snapshot_path.display(), "No local snapshot");
                return Ok(false);
            }
            Err(source) => {
                return Err(RegistryError::SnapshotIo {
                    path: self.snapshot_path.clone(),
                    source,
                })
            }
        };

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|source| RegistryError::SnapshotDecode {
                path: self.snapshot_path.clone(),
                source,
            })?;
        let entries = parse_entries(body)?;
        let count = entries.len();
        self.replace(entries);

        info!(
            registry = self.label,
            chains = count,
            path = %self.snapshot_path.display(),
            "Loaded chain registry snapshot"
        );
        Ok(true)
    }

    /// Makes sure a list is loaded: keeps what is in memory, else the local
    /// snapshot, else a remote refresh.
    pub async fn ensure_loaded(&self) -> Result<(), RegistryError> {
        if !self.is_empty() {
            return Ok(());
        }
        if !self.load_local_snapshot().await? {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Finds the entry whose chain id equals `chain_id`.
    ///
    /// Ids are compared numerically, so `"1"` and `1` both match chain 1.
    /// When several entries carry the same id, the first wins.
    pub fn select(&self, chain_id: u64) -> Result<SelectedChain, RegistryError> {
        if let Some(selected) = self
            .selections
            .read()
            .ok()
            .and_then(|memo| memo.get(&chain_id).cloned())
        {
            return Ok(selected);
        }

        let snapshot = self.snapshot();
        let entry = snapshot
            .iter()
            .filter_map(Value::as_object)
            .find(|entry| entry_chain_id(entry) == Some(chain_id))
            .ok_or(RegistryError::ChainNotSupported { chain_id })?;

        let selected = SelectedChain {
            chain_id,
            entry: Arc::new(entry.clone()),
        };
        if let Ok(mut memo) = self.selections.write() {
            memo.insert(chain_id, selected.clone());
        }
        debug!(registry = self.label, chain_id, "Selected chain");
        Ok(selected)
    }

    /// Returns field `key` of the selected entry.
    ///
    /// For `rpc`, every URL has the API key placeholder substituted.
    pub fn value_for(
        &self,
        selected: Option<&SelectedChain>,
        key: &str,
    ) -> Result<Value, RegistryError> {
        let selected = selected.ok_or(RegistryError::NoChainSelected)?;
        let value = selected
            .get(key)
            .ok_or_else(|| RegistryError::FieldMissing {
                chain_id: selected.chain_id,
                key: key.to_string(),
            })?;

        if key == "rpc" {
            Ok(substitute_api_key(value, self.api_key.as_deref()))
        } else {
            Ok(value.clone())
        }
    }

    /// RPC URLs of `chain_id`, placeholder substituted, in registry order.
    pub fn rpc_urls(&self, chain_id: u64) -> Result<Vec<String>, RegistryError> {
        let selected = self.select(chain_id)?;
        let value = self.value_for(Some(&selected), "rpc")?;
        Ok(value
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(|url| url.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Typed view of every entry that has one.
    pub fn chains(&self) -> Vec<ChainInfo> {
        self.snapshot()
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| ChainInfo::from_entry(entry, self.api_key.as_deref()))
            .collect()
    }

    fn snapshot(&self) -> Arc<Vec<Value>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, entries: Vec<Value>) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
        self.selections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    async fn persist(&self, entries: &[Value]) -> Result<(), RegistryError> {
        let io_error = |source| RegistryError::SnapshotIo {
            path: self.snapshot_path.clone(),
            source,
        };

        if let Some(parent) = self.snapshot_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| io_error(std::io::Error::other(e)))?;
        tokio::fs::write(&self.snapshot_path, bytes)
            .await
            .map_err(io_error)?;

        debug!(registry = self.label, path = %self.snapshot_path.display(), "Saved chain registry snapshot");
        Ok(())
    }
}

/// Accepts a flat list or a `{ result: [...] }` envelope.
fn parse_entries(body: Value) -> Result<Vec<Value>, RegistryError> {
    match body {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut envelope) => match envelope.remove("result") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(RegistryError::InvalidFormat {
                reason: format!("`result` is {}, expected a list", json_kind(&other)),
            }),
            None => Err(RegistryError::InvalidFormat {
                reason: "object without a `result` field".to_string(),
            }),
        },
        other => Err(RegistryError::InvalidFormat {
            reason: format!("top-level {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

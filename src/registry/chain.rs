//! Typed views over raw registry entries

use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::constants::RPC_API_KEY_PLACEHOLDER;

/// Keys that may carry the numeric chain id.
const CHAIN_ID_KEYS: [&str; 2] = ["chainid", "chainId"];

/// Reads the chain id of an entry.
///
/// The explorer chain list stores it as a decimal string under `chainid`,
/// the RPC registry as a number under `chainId`.
pub(crate) fn entry_chain_id(entry: &Map<String, Value>) -> Option<u64> {
    CHAIN_ID_KEYS
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

/// Replaces the RPC key placeholder in every string of `value`.
///
/// Without an API key the value is returned unchanged.
pub(crate) fn substitute_api_key(value: &Value, api_key: Option<&str>) -> Value {
    let Some(api_key) = api_key else {
        return value.clone();
    };
    match value {
        Value::String(s) => Value::String(s.replace(RPC_API_KEY_PLACEHOLDER, api_key)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_api_key(item, Some(api_key)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A chain as described by a registry entry
///
/// Built from either registry shape. Entries that cannot produce a non-empty
/// `explorer_base_url` have no typed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Numeric chain id
    pub chain_id: u64,
    /// Human-readable name
    pub chain_name: String,
    /// Explorer API URL (`apiurl`) or the first explorer's site URL
    pub explorer_base_url: String,
    /// RPC URLs with the API key placeholder substituted; may be empty
    pub rpc_urls: Vec<String>,
}

impl ChainInfo {
    /// Builds the typed view of a raw entry.
    pub fn from_entry(entry: &Map<String, Value>, api_key: Option<&str>) -> Option<Self> {
        let chain_id = entry_chain_id(entry)?;
        let chain_name = ["chainname", "name"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(Value::as_str))?
            .to_string();

        let explorer_base_url = entry
            .get("apiurl")
            .and_then(Value::as_str)
            .or_else(|| {
                entry
                    .get("explorers")
                    .and_then(Value::as_array)
                    .and_then(|explorers| explorers.first())
                    .and_then(|explorer| explorer.get("url"))
                    .and_then(Value::as_str)
            })
            .filter(|url| !url.is_empty())?
            .to_string();

        let rpc_urls = entry
            .get("rpc")
            .map(|rpc| substitute_api_key(rpc, api_key))
            .and_then(|rpc| rpc.as_array().cloned())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|url| url.as_str().map(str::to_string))
            .collect();

        Some(Self {
            chain_id,
            chain_name,
            explorer_base_url,
            rpc_urls,
        })
    }

    /// The well-known chain for this id, if Alloy knows it.
    pub fn named(&self) -> Option<NamedChain> {
        NamedChain::try_from(self.chain_id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn chain_id_from_string_or_number() {
        assert_eq!(entry_chain_id(&object(json!({"chainid": "8453"}))), Some(8453));
        assert_eq!(entry_chain_id(&object(json!({"chainId": 10}))), Some(10));
        assert_eq!(entry_chain_id(&object(json!({"chainid": "abc"}))), None);
        assert_eq!(entry_chain_id(&object(json!({"name": "x"}))), None);
    }

    #[test]
    fn explorer_entry_view() {
        let entry = object(json!({
            "chainname": "Ethereum Mainnet",
            "chainid": "1",
            "apiurl": "https://api.etherscan.io/v2/api?chainid=1"
        }));
        let info = ChainInfo::from_entry(&entry, None).unwrap();
        assert_eq!(info.chain_id, 1);
        assert_eq!(info.chain_name, "Ethereum Mainnet");
        assert_eq!(info.explorer_base_url, "https://api.etherscan.io/v2/api?chainid=1");
        assert!(info.rpc_urls.is_empty());
        assert_eq!(info.named(), Some(NamedChain::Mainnet));
    }

    #[test]
    fn rpc_entry_view_substitutes_key() {
        let entry = object(json!({
            "name": "Ethereum Mainnet",
            "chainId": 1,
            "rpc": ["https://mainnet.infura.io/v3/${INFURA_API_KEY}", "https://eth.llamarpc.com"],
            "explorers": [{"name": "etherscan", "url": "https://etherscan.io"}]
        }));
        let info = ChainInfo::from_entry(&entry, Some("proj")).unwrap();
        assert_eq!(info.explorer_base_url, "https://etherscan.io");
        assert_eq!(
            info.rpc_urls,
            vec!["https://mainnet.infura.io/v3/proj", "https://eth.llamarpc.com"]
        );
    }

    #[test]
    fn entry_without_explorer_has_no_view() {
        let entry = object(json!({"name": "Devnet", "chainId": 1337, "rpc": []}));
        assert!(ChainInfo::from_entry(&entry, None).is_none());
    }
}

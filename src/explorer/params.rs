//! Query parameters and the per-action allow-list

use serde_json::{Map, Value};

/// Parameters of one explorer request.
///
/// Values are kept as JSON so numbers, strings and booleans render the way
/// the explorer expects. `None` values passed to [`with_opt`](Self::with_opt)
/// are skipped.
///
/// ```rust
/// use chaingate::explorer::QueryParams;
///
/// let params = QueryParams::new()
///     .with("address", "0xA")
///     .with("page", 1)
///     .with_opt("offset", None::<u32>);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Map<String, Value>);

impl QueryParams {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds `key` only when `value` is `Some`.
    #[must_use]
    pub fn with_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Adds or replaces `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value of `key`, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keeps only the keys in `allowed`; nulls are dropped as well.
    pub fn retain_allowed(mut self, allowed: &[&str]) -> Self {
        self.0
            .retain(|key, value| !value.is_null() && allowed.contains(&key.as_str()));
        self
    }

    /// The parameters as a JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// `(key, value)` pairs as they go on the query string. Strings are
    /// sent verbatim, everything else as its JSON text.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.0.iter().map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), rendered)
        })
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

const DATE_RANGE: &[&str] = &["startdate", "enddate", "sort"];
const TRANSFERS: &[&str] = &[
    "address",
    "contractaddress",
    "page",
    "offset",
    "startblock",
    "endblock",
    "sort",
];
const TOPICS: &[&str] = &[
    "address",
    "fromBlock",
    "toBlock",
    "topic0",
    "topic1",
    "topic2",
    "topic3",
    "topic0_1_opr",
    "topic0_2_opr",
    "topic0_3_opr",
    "topic1_2_opr",
    "topic1_3_opr",
    "topic2_3_opr",
    "page",
    "offset",
];

/// Parameter names accepted by `action`, or `None` for an unknown action.
///
/// Names are the wire names, with the explorer's own casing and spelling.
pub fn allowed_params(action: &str) -> Option<&'static [&'static str]> {
    let allowed: &'static [&'static str] = match action {
        // accounts
        "balance" | "balancemulti" => &["address", "tag"],
        "txlist" => &["address", "startblock", "endblock", "page", "offset", "sort"],
        "txlistinternal" => &[
            "address",
            "txhash",
            "startblock",
            "endblock",
            "page",
            "offset",
            "sort",
        ],
        "tokentx" | "tokennfttx" | "token1155tx" | "txsBeaconWithdrawal" => TRANSFERS,
        "getminedblocks" => &["address", "blocktype", "page", "offset"],
        "balancehistory" => &["address", "blockno"],

        // contracts
        "getabi" | "getsourcecode" => &["address"],
        "getcontractcreation" => &["contractaddresses"],
        "verifysourcecode" => &[
            "codeformat",
            "sourceCode",
            "constructorArguements",
            "contractaddress",
            "contractname",
            "compilerversion",
        ],
        "checkverifystatus" | "checkproxyverification" => &["guid"],
        "verifyproxycontract" => &["address", "expectedimplementation"],

        // transactions
        "getstatus" | "gettxreceiptstatus" => &["txhash"],

        // blocks
        "getblockreward" | "getblockcountdown" => &["blockno"],
        "getblocknobytime" => &["timestamp", "closest"],
        "dailyavgblocksize" | "dailyblkcount" | "dailyblockrewards" | "dailyavgblocktime"
        | "dailyuncleblkcount" => DATE_RANGE,

        // logs
        "getLogs" => TOPICS,

        // proxy
        "eth_blockNumber" | "eth_gasPrice" => &[],
        "eth_getBlockByNumber" => &["tag", "boolean"],
        "eth_getUncleByBlockNumberAndIndex" | "eth_getTransactionByBlockNumberAndIndex" => {
            &["tag", "index"]
        }
        "eth_getBlockTransactionCountByNumber" => &["tag"],
        "eth_getTransactionByHash" | "eth_getTransactionReceipt" => &["txhash"],
        "eth_getTransactionCount" | "eth_getCode" => &["address", "tag"],
        "eth_sendRawTransaction" => &["hex"],
        "eth_call" => &["to", "data", "tag"],
        "eth_getStorageAt" => &["address", "position", "tag"],
        "eth_estimateGas" => &["data", "to", "value", "gas", "gasPrice"],

        // tokens
        "tokensupply" | "tokeninfo" => &["contractaddress"],
        "tokenbalance" => &["contractaddress", "address", "tag"],
        "tokensupplyhistory" => &["contractaddress", "blockno"],
        "tokenbalancehistory" => &["contractaddress", "address", "blockno"],
        "tokenholderlist" => &["contractaddress", "page", "offset"],
        "addresstokenbalance" | "addresstokennftbalance" => &["address", "page", "offset"],
        "addresstokennftinventory" => &["address", "contractaddress", "page", "offset"],

        // gas tracker
        "gasestimate" => &["gasprice"],
        "gasoracle" => &[],
        "dailyavggaslimit" | "dailygasused" | "dailyavggasprice" => DATE_RANGE,

        // stats
        "ethsupply" | "ethsupply2" | "ethprice" | "nodecount" => &[],
        "chainsize" => &["startdate", "enddate", "clienttype", "syncmode", "sort"],
        "dailytxnfee" | "dailynewaddress" | "dailynetutilization" | "dailyavghashrate"
        | "dailytx" | "dailyavgnetdifficulty" | "ethdailymarketcap" | "ethdailyprice" => {
            DATE_RANGE
        }

        // chain specific
        "txnbridge" => &["address", "blocktype", "page", "offset"],

        // usage
        "getapilimit" => &[],

        _ => return None,
    };
    Some(allowed)
}

/// Actions with side effects upstream; their responses are never cached.
pub fn is_cacheable(action: &str) -> bool {
    !matches!(
        action,
        "eth_sendRawTransaction" | "verifysourcecode" | "verifyproxycontract"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_keys_are_dropped() {
        let params = QueryParams::new()
            .with("address", "0xA")
            .with("evil_param", "x")
            .retain_allowed(allowed_params("balance").unwrap());

        assert_eq!(params.get("address"), Some(&json!("0xA")));
        assert!(params.get("evil_param").is_none());
    }

    #[test]
    fn nulls_are_dropped() {
        let params = QueryParams::new()
            .with("address", Value::Null)
            .retain_allowed(&["address"]);
        assert!(params.is_empty());
    }

    #[test]
    fn unknown_action_has_no_allow_list() {
        assert!(allowed_params("eth_block_number").is_none());
        assert!(allowed_params("eth_blockNumber").is_some());
    }

    #[test]
    fn query_pairs_render_scalars() {
        let params: QueryParams = [
            ("boolean", json!(true)),
            ("page", json!(2)),
            ("tag", json!("latest")),
        ]
        .into_iter()
        .collect();
        let pairs: Vec<(&str, String)> = params.query_pairs().collect();
        assert_eq!(
            pairs,
            vec![
                ("boolean", "true".to_string()),
                ("page", "2".to_string()),
                ("tag", "latest".to_string())
            ]
        );
    }

    #[test]
    fn side_effecting_actions_are_not_cached() {
        assert!(!is_cacheable("eth_sendRawTransaction"));
        assert!(is_cacheable("balance"));
    }
}

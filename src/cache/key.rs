// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic cache keys for explorer requests.

use serde_json::{Map, Value};

/// Builds the cache key `{namespace}:{chain_id}:{module}:{action}:{params}`.
///
/// `params` is rendered as canonical JSON, so two maps with the same entries
/// always produce the same key regardless of insertion order.
///
/// ```rust
/// use chaingate::cache::explorer_cache_key;
/// use serde_json::{json, Map};
///
/// let mut params = Map::new();
/// params.insert("tag".into(), json!("latest"));
/// params.insert("address".into(), json!("0xA"));
///
/// assert_eq!(
///     explorer_cache_key("etherscanv2", 1, "account", "balance", &params),
///     r#"etherscanv2:1:account:balance:{"address":"0xA","tag":"latest"}"#
/// );
/// ```
pub fn explorer_cache_key(
    namespace: &str,
    chain_id: u64,
    module: &str,
    action: &str,
    params: &Map<String, Value>,
) -> String {
    format!(
        "{namespace}:{chain_id}:{module}:{action}:{}",
        canonical_json(&Value::Object(params.clone()))
    )
}

/// Renders a JSON value with object keys sorted at every depth.
///
/// `serde_json::Map` is a `BTreeMap` unless the `preserve_order` feature is
/// enabled, so compact serialization is already canonical.
pub fn canonical_json(value: &Value) -> String {
    value.to_string()
}

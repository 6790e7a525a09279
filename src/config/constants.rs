//! Well-known endpoints and protocol constants
//!
//! Centralizes the magic values used across the crate.

use std::time::Duration;

/// Etherscan v2 chain list, enveloped as `{ totalcount, result: [...] }`.
pub const EXPLORER_CHAINLIST_URL: &str = "https://api.etherscan.io/v2/chainlist";

/// Community chain registry with RPC URLs, served as a flat JSON list.
pub const RPC_REGISTRY_URL: &str = "https://chainid.network/chains.json";

/// Snapshot file name for the explorer chain list.
pub const EXPLORER_SNAPSHOT_FILE: &str = "explorer_chains.json";

/// Snapshot file name for the RPC registry.
pub const RPC_SNAPSHOT_FILE: &str = "chains.json";

/// Default directory for registry snapshots.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Placeholder in RPC URLs that is replaced by the configured project id.
pub const RPC_API_KEY_PLACEHOLDER: &str = "${INFURA_API_KEY}";

/// Cache key namespace for explorer responses.
pub const EXPLORER_CACHE_NAMESPACE: &str = "etherscanv2";

/// Upper bound used when a caller does not restrict a block range.
pub const DEFAULT_END_BLOCK: u64 = 99_999_999;

/// Number of trailing blocks sampled for priority fee estimation.
pub const FEE_HISTORY_BLOCKS: u64 = 3;

/// Default admissions per rate limit window.
pub const DEFAULT_RATE_LIMIT_CALLS: u32 = 5;

/// Default rate limit window.
pub const DEFAULT_RATE_LIMIT_PERIOD: Duration = Duration::from_secs(1);

/// Default TTL for cached explorer responses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10);

/// Default timeout for explorer and registry HTTP requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between receipt polls.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default deadline when waiting for a receipt.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

//! Parameter-shaping facades over [`ExplorerClient::request`](super::ExplorerClient::request)
//!
//! Each facade borrows the client and maps typed arguments onto the wire
//! parameters of one explorer module. Block tags default to `latest`.

mod accounts;
mod blocks;
mod chain_specific;
mod contracts;
mod gas_tracker;
mod logs;
mod proxy;
mod stats;
mod tokens;
mod transactions;
mod usage;

pub use accounts::Accounts;
pub use blocks::Blocks;
pub use chain_specific::ChainSpecific;
pub use contracts::{Contracts, VerifySourceRequest};
pub use gas_tracker::GasTracker;
pub use logs::{LogQuery, Logs, TopicOperator};
pub use proxy::{EstimateGasRequest, Proxy};
pub use stats::Stats;
pub use tokens::Tokens;
pub use transactions::Transactions;
pub use usage::Usage;

const LATEST: &str = "latest";

fn tag_or_latest(tag: Option<&str>) -> &str {
    tag.unwrap_or(LATEST)
}

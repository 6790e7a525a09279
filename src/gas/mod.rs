//! Tiered gas pricing for EVM chains.
//!
//! ## Public API
//!
//! - [`GasLevel`] - Pricing tier (`slow`, `normal`, `fast`) and its fee
//!   history percentiles
//! - [`GasQuote`] - EIP-1559 or legacy fee fields
//! - [`GasEstimator`] - Computes a quote from a [`NodeClient`](crate::node::NodeClient)
//!
//! ## Pricing
//!
//! On fee-market chains the quote is
//! `max_priority_fee = avg(rewards)` and
//! `max_fee = avg(rewards) + 2 * pending_base_fee`, where `rewards` are the
//! fee history samples of the last few blocks at the tier's percentiles.
//! Any failure on that path falls back to the node's legacy gas price.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::GasError;

mod estimator;

pub use estimator::{average_reward, GasEstimator};

/// Inclusion speed tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GasLevel {
    /// Under a minute
    Slow,
    /// Under 30 seconds
    #[default]
    Normal,
    /// Under 10 seconds
    Fast,
}

impl GasLevel {
    /// Every tier, slowest first
    pub const ALL: [GasLevel; 3] = [GasLevel::Slow, GasLevel::Normal, GasLevel::Fast];

    /// Reward percentiles requested from `eth_feeHistory`.
    pub fn percentiles(&self) -> &'static [f64; 5] {
        match self {
            GasLevel::Slow => &[10.0, 20.0, 30.0, 40.0, 50.0],
            GasLevel::Normal => &[10.0, 30.0, 50.0, 70.0, 90.0],
            GasLevel::Fast => &[50.0, 60.0, 70.0, 80.0, 90.0],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GasLevel::Slow => "slow",
            GasLevel::Normal => "normal",
            GasLevel::Fast => "fast",
        }
    }
}

impl fmt::Display for GasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GasLevel {
    type Err = GasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(GasLevel::Slow),
            "normal" => Ok(GasLevel::Normal),
            "fast" => Ok(GasLevel::Fast),
            other => Err(GasError::UnsupportedLevel {
                level: other.to_string(),
            }),
        }
    }
}

/// Fee fields of an unsigned transaction, in wei
///
/// Serializes with the JSON-RPC field names, so it can be flattened into a
/// transaction object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GasQuote {
    /// Fee-market pricing
    #[serde(rename_all = "camelCase")]
    Eip1559 {
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
    },
    /// Single gas price
    #[serde(rename_all = "camelCase")]
    Legacy { gas_price: u128 },
}

impl GasQuote {
    pub fn is_eip1559(&self) -> bool {
        matches!(self, GasQuote::Eip1559 { .. })
    }

    /// The most the sender pays per gas unit.
    pub fn max_fee_per_gas(&self) -> u128 {
        match self {
            GasQuote::Eip1559 {
                max_fee_per_gas, ..
            } => *max_fee_per_gas,
            GasQuote::Legacy { gas_price } => *gas_price,
        }
    }
}

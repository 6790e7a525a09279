use tracing::{debug, warn, Instrument};

use crate::config::constants::FEE_HISTORY_BLOCKS;
use crate::errors::GasError;
use crate::node::NodeClient;
use crate::spans;

use super::{GasLevel, GasQuote};

/// Computes [`GasQuote`]s from node fee data
#[derive(Debug, Clone, Copy)]
pub struct GasEstimator {
    block_count: u64,
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self {
            block_count: FEE_HISTORY_BLOCKS,
        }
    }
}

impl GasEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recent blocks sampled from `eth_feeHistory`.
    #[must_use]
    pub fn with_block_count(mut self, block_count: u64) -> Self {
        self.block_count = block_count.max(1);
        self
    }

    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Quote for `level`.
    ///
    /// Chains without a pending base fee get a legacy quote, as does any
    /// failure while computing the fee-market quote. Only a failure of the
    /// legacy `eth_gasPrice` call itself is returned as an error.
    pub async fn quote(
        &self,
        node: &dyn NodeClient,
        level: GasLevel,
    ) -> Result<GasQuote, GasError> {
        let span = spans::gas_quote(level, self.block_count);
        async {
            match self.fee_market_quote(node, level).await {
                Ok(Some(quote)) => Ok(quote),
                Ok(None) => {
                    debug!("Pending block has no base fee, using legacy gas price");
                    legacy_quote(node).await
                }
                Err(e) => {
                    warn!(error = %e, "Fee market pricing failed, using legacy gas price");
                    legacy_quote(node).await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn fee_market_quote(
        &self,
        node: &dyn NodeClient,
        level: GasLevel,
    ) -> Result<Option<GasQuote>, GasError> {
        let Some(base_fee) = node.pending_base_fee().await? else {
            return Ok(None);
        };
        // Overestimate; the unused part of max_fee is refunded
        let next_base_fee = base_fee.saturating_mul(2);

        let rewards = node
            .fee_history_rewards(self.block_count, level.percentiles())
            .await?
            .ok_or(GasError::EmptyFeeHistory)?;
        let priority_fee = average_reward(&rewards).ok_or(GasError::EmptyFeeHistory)?;

        debug!(base_fee, priority_fee, "Fee market quote");
        Ok(Some(GasQuote::Eip1559 {
            max_priority_fee_per_gas: priority_fee,
            max_fee_per_gas: priority_fee.saturating_add(next_base_fee),
        }))
    }
}

async fn legacy_quote(node: &dyn NodeClient) -> Result<GasQuote, GasError> {
    let gas_price = node.gas_price().await?;
    Ok(GasQuote::Legacy { gas_price })
}

/// Floor of the mean over every sample of every block, or `None` when
/// there are no samples.
pub fn average_reward(rewards: &[Vec<u128>]) -> Option<u128> {
    let (sum, count) = rewards
        .iter()
        .flatten()
        .fold((0u128, 0u128), |(sum, count), reward| {
            (sum.saturating_add(*reward), count + 1)
        });
    (count > 0).then(|| sum / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_reward_floors() {
        let rewards = vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10], vec![11, 12, 13, 14, 16]];
        // 121 / 15 = 8.07
        assert_eq!(average_reward(&rewards), Some(8));
    }

    #[test]
    fn test_average_reward_empty() {
        assert_eq!(average_reward(&[]), None);
        assert_eq!(average_reward(&[vec![], vec![]]), None);
    }

    #[test]
    fn test_block_count_is_at_least_one() {
        assert_eq!(GasEstimator::new().block_count(), 3);
        assert_eq!(GasEstimator::new().with_block_count(0).block_count(), 1);
    }
}

//! Error types for gas pricing and transaction assembly.

use super::RpcError;

/// Errors that can occur while computing a gas quote.
#[derive(Debug, thiserror::Error)]
pub enum GasError {
    /// The requested speed tier does not exist.
    #[error("Unsupported gas level '{level}'; expected one of slow, normal, fast")]
    UnsupportedLevel {
        /// The rejected level name
        level: String,
    },

    /// The node returned no priority fee samples.
    #[error("Fee history returned no reward samples")]
    EmptyFeeHistory,

    /// RPC failure while sampling the fee market.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Errors returned by the [`TransactionAssembler`](crate::TransactionAssembler).
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Gas tier or fee computation failure.
    #[error(transparent)]
    Gas(#[from] GasError),

    /// Node resolution or RPC failure.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

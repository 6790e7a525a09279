//! Shared RPC error types for node operations.
//!
//! These cover failures when resolving a node endpoint for a chain and when
//! calling it through Alloy.

use std::time::Duration;

use super::{RateLimitError, RegistryError};

/// Errors that can occur during blockchain RPC operations.
///
/// # Examples
///
/// ```rust
/// use chaingate::RpcError;
///
/// let error = RpcError::NoEndpoint { chain_id: 42 };
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The chain has no entry in the RPC registry.
    #[error("Chain {chain_id} is not supported")]
    UnsupportedChain {
        /// The requested chain id
        chain_id: u64,
    },

    /// The chain is known but none of its RPC URLs is usable over HTTP.
    #[error("No usable HTTP RPC endpoint for chain {chain_id}")]
    NoEndpoint {
        /// The requested chain id
        chain_id: u64,
    },

    /// An RPC URL could not be parsed.
    #[error("Invalid RPC URL: {url}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// The node transport's rate limit is invalid.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// Registry lookup failed for a reason other than an unknown chain.
    #[error(transparent)]
    Registry(RegistryError),

    /// An RPC call failed.
    ///
    /// This is a catch-all for network errors, timeouts, provider downtime
    /// and JSON-RPC error responses.
    #[error("RPC call {method} failed")]
    CallFailed {
        /// The JSON-RPC method that failed
        method: &'static str,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No receipt appeared before the wait deadline.
    #[error("Receipt for {tx_hash} not available after {waited:?}")]
    ReceiptTimeout {
        /// The transaction hash
        tx_hash: String,
        /// How long the caller waited
        waited: Duration,
    },
}

impl RpcError {
    /// Helper to create a `CallFailed` error from any error type.
    pub fn call_failed(
        method: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::CallFailed {
            method,
            source: Box::new(source),
        }
    }
}

impl From<RegistryError> for RpcError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::ChainNotSupported { chain_id } => RpcError::UnsupportedChain { chain_id },
            other => RpcError::Registry(other),
        }
    }
}

//! Error types for the chaingate library.
//!
//! Errors follow a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`ExplorerError`],
//!   [`CacheError`], [`RegistryError`], ...)
//! - **Unified error type** ([`GatewayError`]) for callers that only care
//!   about the broad class of failure
//!
//! Every error maps to an [`ErrorCategory`], which is the taxonomy callers
//! should branch on when deciding whether to retry, reconfigure, or surface
//! the failure.
//!
//! # Examples
//!
//! ```rust,ignore
//! use chaingate::{ErrorCategory, Gateway, GatewayError};
//!
//! async fn balance(gateway: &Gateway) -> Result<(), GatewayError> {
//!     match gateway.explorer().accounts().balance("0xabc").await {
//!         Ok(value) => println!("balance: {value}"),
//!         Err(e) if e.category() == ErrorCategory::Transport => {
//!             eprintln!("network trouble, retry later: {e}");
//!         }
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod explorer;
mod gas;
mod rate_limit;
mod registry;
mod rpc;
mod transport;

pub use cache::CacheError;
pub use config::ConfigError;
pub use explorer::ExplorerError;
pub use gas::{GasError, TransactionError};
pub use rate_limit::RateLimitError;
pub use registry::RegistryError;
pub use rpc::RpcError;
pub use transport::TransportError;

pub(crate) use transport::redact_url;

/// Broad failure classes shared by every error in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad or missing configuration, unknown chain, unknown action or tier.
    Configuration,
    /// Network failure, timeout, or non-200 HTTP status.
    Transport,
    /// The remote answered but reported a failure in its payload.
    UpstreamApplication,
    /// The cache backend is unreachable or holds a corrupt entry.
    Cache,
    /// A rate limiter was constructed with invalid bounds.
    RateLimiterMisconfiguration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Transport => "transport",
            ErrorCategory::UpstreamApplication => "upstream",
            ErrorCategory::Cache => "cache",
            ErrorCategory::RateLimiterMisconfiguration => "rate-limiter",
        };
        f.write_str(label)
    }
}

impl ConfigError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl RateLimitError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::RateLimiterMisconfiguration
    }
}

impl TransportError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Transport
    }
}

impl CacheError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Cache
    }
}

impl RegistryError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::Fetch(_) => ErrorCategory::Transport,
            RegistryError::InvalidFormat { .. } => ErrorCategory::UpstreamApplication,
            RegistryError::ChainNotSupported { .. }
            | RegistryError::NoChainSelected
            | RegistryError::FieldMissing { .. }
            | RegistryError::SnapshotIo { .. }
            | RegistryError::SnapshotDecode { .. } => ErrorCategory::Configuration,
        }
    }
}

impl ExplorerError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplorerError::NoChainSelected
            | ExplorerError::UnknownAction { .. }
            | ExplorerError::InvalidBaseUrl { .. } => ErrorCategory::Configuration,
            ExplorerError::Upstream { .. }
            | ExplorerError::ProtocolVersion { .. }
            | ExplorerError::MalformedResponse { .. } => ErrorCategory::UpstreamApplication,
            ExplorerError::Transport(e) => e.category(),
            ExplorerError::Cache(e) => e.category(),
            ExplorerError::Registry(e) => e.category(),
        }
    }
}

impl RpcError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RpcError::UnsupportedChain { .. }
            | RpcError::NoEndpoint { .. }
            | RpcError::InvalidUrl { .. } => ErrorCategory::Configuration,
            RpcError::Registry(e) => e.category(),
            RpcError::RateLimit(e) => e.category(),
            RpcError::CallFailed { .. } | RpcError::ReceiptTimeout { .. } => {
                ErrorCategory::Transport
            }
        }
    }
}

impl GasError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GasError::UnsupportedLevel { .. } => ErrorCategory::Configuration,
            GasError::EmptyFeeHistory => ErrorCategory::UpstreamApplication,
            GasError::Rpc(e) => e.category(),
        }
    }
}

impl TransactionError {
    /// Returns the broad failure class.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransactionError::Gas(e) => e.category(),
            TransactionError::Rpc(e) => e.category(),
        }
    }
}

/// Unified error type for all chaingate operations.
///
/// All module-specific error types convert into `GatewayError` via `From`,
/// so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rate limiter construction error.
    #[error("Rate limiter error: {0}")]
    RateLimit(#[from] RateLimitError),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Chain registry error.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Explorer request error.
    #[error("Explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Node RPC error.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Gas pricing error.
    #[error("Gas error: {0}")]
    Gas(#[from] GasError),

    /// Transaction assembly error.
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl GatewayError {
    /// Returns the broad failure class of the wrapped error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::Config(e) => e.category(),
            GatewayError::RateLimit(e) => e.category(),
            GatewayError::Cache(e) => e.category(),
            GatewayError::Registry(e) => e.category(),
            GatewayError::Explorer(e) => e.category(),
            GatewayError::Rpc(e) => e.category(),
            GatewayError::Gas(e) => e.category(),
            GatewayError::Transaction(e) => e.category(),
        }
    }
}

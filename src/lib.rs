//! Multi-chain EVM gateway core.
//!
//! - [`explorer`] - Etherscan v2 style explorer client with typed endpoint
//!   facades, shared rate limiting and cache-aside responses
//! - [`cache`] - JSON cache over Redis, memory or nothing
//! - [`registry`] - Chain lists with local snapshots
//! - [`node`] / [`gas`] / [`transaction`] - Node access, tiered gas quotes
//!   and unsigned transaction assembly
//! - [`Gateway`] - One context object owning all of the above
//!
//! Errors are per-module `thiserror` enums that all convert into
//! [`GatewayError`]; each reports an [`ErrorCategory`].

pub mod cache;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod gas;
mod gateway;
pub mod node;
pub mod registry;
mod spans;
pub mod transaction;
pub mod transport;

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use errors::{
    CacheError, ConfigError, ErrorCategory, ExplorerError, GasError, GatewayError,
    RateLimitError, RegistryError, RpcError, TransactionError, TransportError,
};
pub use explorer::{ExplorerClient, QueryParams};
pub use gas::{GasEstimator, GasLevel, GasQuote};
pub use gateway::Gateway;
pub use node::{AlloyNodeClient, NodeClient, NodePool};
pub use registry::{ChainInfo, ChainRegistry, SelectedChain};
pub use transaction::{TransactionAssembler, UnsignedTransaction};
pub use transport::RateLimiter;

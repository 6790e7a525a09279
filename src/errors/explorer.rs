//! Error types for block explorer requests.

use super::{CacheError, RegistryError, TransportError};

/// Errors returned by [`ExplorerClient`](crate::ExplorerClient) requests.
///
/// # Examples
///
/// ```rust
/// use chaingate::{ErrorCategory, ExplorerError};
///
/// let error = ExplorerError::Upstream {
///     message: "NOTOK".to_string(),
///     detail: "Invalid API Key".to_string(),
/// };
/// assert_eq!(error.category(), ErrorCategory::UpstreamApplication);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// `request` was called before `select_chain`.
    #[error("No chain selected; call select_chain first")]
    NoChainSelected,

    /// The action has no entry in the parameter allow-list.
    #[error("Unknown explorer action: {action}")]
    UnknownAction {
        /// The rejected action name
        action: String,
    },

    /// The selected chain's API base URL cannot be parsed.
    #[error("Invalid explorer base URL for chain {chain_id}")]
    InvalidBaseUrl {
        /// The selected chain
        chain_id: u64,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// The explorer reported an application-level failure.
    #[error("Explorer error ({message}): {detail}")]
    Upstream {
        /// The envelope's `message` field
        message: String,
        /// The envelope's `result` field, or the JSON-RPC error message
        detail: String,
    },

    /// A JSON-RPC envelope declared a protocol version other than 2.0.
    #[error("Unsupported JSON-RPC version: {version}")]
    ProtocolVersion {
        /// The declared version
        version: String,
    },

    /// The body is valid JSON but matches neither known envelope.
    #[error("Malformed explorer response: {reason}")]
    MalformedResponse {
        /// Description of what was found
        reason: String,
    },

    /// HTTP failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Cache failure.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Chain selection failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

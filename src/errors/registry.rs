//! Error types for chain registry lookups and refreshes.

use std::path::PathBuf;

use super::TransportError;

/// Errors that can occur while loading or querying a
/// [`ChainRegistry`](crate::ChainRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No entry in the snapshot carries the requested chain id.
    #[error("Chain {chain_id} is not supported")]
    ChainNotSupported {
        /// The requested chain id
        chain_id: u64,
    },

    /// A field lookup was attempted before any chain was selected.
    #[error("No chain selected")]
    NoChainSelected,

    /// The selected entry has no such field.
    #[error("Field '{key}' not found for chain {chain_id}")]
    FieldMissing {
        /// The selected chain
        chain_id: u64,
        /// The requested field name
        key: String,
    },

    /// Fetching the remote chain list failed.
    #[error("Failed to fetch chain list")]
    Fetch(#[from] TransportError),

    /// The chain list payload is neither a list nor a `{ result: [...] }` envelope.
    #[error("Unrecognized chain list format: {reason}")]
    InvalidFormat {
        /// Description of what was found
        reason: String,
    },

    /// Reading or writing the local snapshot failed.
    #[error("Snapshot I/O failed for {path}")]
    SnapshotIo {
        /// Snapshot location
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The local snapshot exists but is not valid JSON.
    #[error("Snapshot at {path} is not valid JSON")]
    SnapshotDecode {
        /// Snapshot location
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

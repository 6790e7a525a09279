//! Error types for the cache gateway.

/// Errors that can occur while talking to the cache backend.
///
/// Callers of the explorer treat these as hard failures; nothing is
/// silently degraded to a cache miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached during initialization.
    #[error("Cache backend {backend} is unreachable")]
    Unavailable {
        /// Name of the backend, e.g. "redis"
        backend: &'static str,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stored value is not valid JSON. The entry has already been deleted
    /// when this error is returned.
    #[error("Cached value for key {key} could not be decoded")]
    Decode {
        /// The offending key
        key: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The value handed to `set` could not be serialized.
    #[error("Value for key {key} could not be serialized")]
    Serialize {
        /// Key the value was destined for
        key: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A backend command failed after initialization.
    #[error("Cache {operation} failed")]
    Backend {
        /// Which operation failed (get, set, delete, scan, ping)
        operation: &'static str,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CacheError {
    /// Helper to create an `Unavailable` error from any error type.
    pub fn unavailable(
        backend: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CacheError::Unavailable {
            backend,
            source: Box::new(source),
        }
    }

    /// Helper to create a `Backend` error from any error type.
    pub fn backend(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CacheError::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

//! Error types for rate limiter construction.

/// Errors raised when a [`RateLimiter`](crate::RateLimiter) is configured
/// with values that cannot describe a window.
///
/// Acquiring a slot never fails; only construction is validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// The window must admit at least one call.
    #[error("Rate limit must allow at least one call per window, got {max_calls}")]
    InvalidMaxCalls {
        /// The rejected call count
        max_calls: u32,
    },

    /// The window length must be strictly positive.
    #[error("Rate limit period must be greater than zero")]
    ZeroPeriod,
}

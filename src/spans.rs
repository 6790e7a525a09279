//! Span creation helpers for chaingate operations.
//!
//! Telemetry concerns are kept out of business logic: instead of
//! `#[instrument]` attributes, each instrumented operation has a span helper
//! here, and the operation runs its async body inside that span.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T, E> {
//!     let span = spans::my_operation(param_value);
//!     async {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use tracing::{Level, Span};

use crate::gas::GasLevel;

/// Create span for one explorer API call, cache lookup included.
///
/// Parent: caller's span (e.g. a facade call site)
/// Children: rate limiter wait, HTTP request
#[inline]
pub(crate) fn explorer_request(chain_id: u64, module: &str, action: &str) -> Span {
    tracing::debug_span!(
        "chaingate.explorer_request",
        chain_id = chain_id,
        module = %module,
        action = %action,
    )
}

/// Create span for fetching and persisting a chain registry.
///
/// Parent: None, or the gateway bootstrap
#[inline]
pub(crate) fn registry_refresh(registry: &str, source_url: &str) -> Span {
    tracing::span!(
        Level::INFO,
        "chaingate.registry_refresh",
        registry = %registry,
        source_url = %crate::errors::redact_url(source_url),
    )
}

/// Create span for assembling an unsigned transaction.
///
/// This is a public API entry point.
///
/// Parent: None (root span for this operation)
/// Children: node RPC spans, gas_quote span
#[inline]
pub(crate) fn assemble_transaction(
    chain_id: u64,
    from: Address,
    to: Address,
    level: GasLevel,
) -> Span {
    tracing::span!(
        Level::INFO,
        "chaingate.assemble_transaction",
        chain_id = chain_id,
        from = %from,
        to = %to,
        gas_level = %level,
    )
}

/// Create span for computing a gas quote.
///
/// Parent: assemble_transaction span, or None for direct quotes
/// Children: node RPC spans
#[inline]
pub(crate) fn gas_quote(level: GasLevel, block_count: u64) -> Span {
    tracing::debug_span!(
        "chaingate.gas_quote",
        gas_level = %level,
        block_count = block_count,
    )
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities.
//!
//! [`RateLimiter`] is the sliding-window limiter shared by the explorer
//! client. The Tower layers wrap Alloy RPC transports:
//!
//! - [`RateLimitLayer`] gates requests through a [`RateLimiter`]
//! - [`LoggingLayer`] records method, duration and failures via `tracing`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chaingate::transport::{LoggingLayer, RateLimitLayer};
//! use alloy_rpc_client::ClientBuilder;
//! use alloy_provider::ProviderBuilder;
//!
//! let client = ClientBuilder::default()
//!     .layer(RateLimitLayer::per_second(10)?)
//!     .layer(LoggingLayer::for_chain(1))
//!     .http(rpc_url);
//!
//! let provider = ProviderBuilder::new().connect_client(client);
//! ```

mod logging;
mod rate_limit;

pub use logging::{LoggingLayer, LoggingService};
pub use rate_limit::{RateLimitLayer, RateLimitService, RateLimiter};

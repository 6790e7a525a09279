// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Alloy provider construction for node endpoints

use alloy_network::Ethereum;
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_rpc_client::ClientBuilder;
use alloy_transport::utils::guess_local_url;
use alloy_transport_http::Http;
use tracing::debug;

use crate::errors::{redact_url, RpcError};
use crate::transport::{LoggingLayer, RateLimitLayer};

use super::config::NodeConfig;

/// Create an HTTP provider for `config`.
///
/// The provider has no fillers; nonce, gas and chain id are supplied by the
/// caller. Rate limiting and logging are tower layers on the RPC client.
///
/// # Errors
///
/// - [`RpcError::InvalidUrl`] if the URL cannot be parsed
/// - [`RpcError::RateLimit`] for a zero rate limit
/// - [`RpcError::CallFailed`] if the HTTP client cannot be built
pub fn connect_http(config: &NodeConfig) -> Result<RootProvider<Ethereum>, RpcError> {
    let url: url::Url = config
        .url
        .parse()
        .map_err(|source| RpcError::InvalidUrl {
            url: redact_url(&config.url),
            source,
        })?;
    let is_local = guess_local_url(url.as_str());

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        http = http.timeout(timeout);
    }
    let http = http
        .build()
        .map_err(|e| RpcError::call_failed("connect", e))?;
    let transport = Http::with_client(http, url);

    let mut logging = match config.chain_id {
        Some(chain_id) => LoggingLayer::for_chain(chain_id),
        None => LoggingLayer::new(),
    };
    if config.log_payloads {
        logging = logging.with_payloads();
    }

    let client = match (config.rate_limit_per_second, config.logging) {
        (Some(rps), true) => ClientBuilder::default()
            .layer(logging)
            .layer(RateLimitLayer::per_second(rps)?)
            .transport(transport, is_local),
        (Some(rps), false) => ClientBuilder::default()
            .layer(RateLimitLayer::per_second(rps)?)
            .transport(transport, is_local),
        (None, true) => ClientBuilder::default()
            .layer(logging)
            .transport(transport, is_local),
        (None, false) => ClientBuilder::default().transport(transport, is_local),
    };

    debug!(
        url = %redact_url(&config.url),
        chain_id = ?config.chain_id,
        rate_limit = ?config.rate_limit_per_second,
        "Connected node provider"
    );

    Ok(ProviderBuilder::new()
        .disable_recommended_fillers()
        .network::<Ethereum>()
        .connect_client(client))
}

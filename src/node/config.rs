// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Node connection options

use std::time::Duration;

/// How to connect to one node endpoint
///
/// # Example
///
/// ```rust
/// use chaingate::node::NodeConfig;
/// use std::time::Duration;
///
/// let config = NodeConfig::new("https://mainnet.infura.io/v3/project")
///     .for_chain(1)
///     .with_rate_limit(10)
///     .with_timeout(Duration::from_secs(5));
/// assert!(config.has_rate_limiting());
/// ```
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Chain the endpoint serves; tags log spans
    pub chain_id: Option<u64>,
    /// Rate limit in requests per second (None for unlimited)
    pub rate_limit_per_second: Option<u32>,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Log every JSON-RPC call through `tracing`
    pub logging: bool,
    /// Also log request and response bodies at `trace`; needs `logging`
    pub log_payloads: bool,
}

impl NodeConfig {
    /// Unthrottled, logged connection to `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            chain_id: None,
            rate_limit_per_second: None,
            timeout: None,
            logging: true,
            log_payloads: false,
        }
    }

    #[must_use]
    pub fn for_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Throttles requests to `requests_per_second`.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.rate_limit_per_second = Some(requests_per_second);
        self
    }

    /// Set rate limiting from an optional value
    #[must_use]
    pub fn with_rate_limit_opt(mut self, requests_per_second: Option<u32>) -> Self {
        self.rate_limit_per_second = requests_per_second;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    #[must_use]
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    #[must_use]
    pub fn has_rate_limiting(&self) -> bool {
        self.rate_limit_per_second.is_some()
    }
}

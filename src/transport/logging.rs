// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower logging layer for node JSON-RPC traffic.
//!
//! Every call made through an Alloy client built with [`LoggingLayer`] runs
//! inside a `chaingate.node_rpc` span tagged with the chain id and the
//! JSON-RPC method, and reports its duration on completion.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

/// A Tower layer that records node RPC calls through `tracing`.
///
/// # Example
///
/// ```rust,ignore
/// use chaingate::transport::LoggingLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(LoggingLayer::for_chain(1))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    chain_id: Option<u64>,
    /// Dump full request and response packets at `trace`
    payloads: bool,
}

impl LoggingLayer {
    /// Logs method, timing and errors only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every span with the chain the node serves.
    pub fn for_chain(chain_id: u64) -> Self {
        Self {
            chain_id: Some(chain_id),
            payloads: false,
        }
    }

    /// Also logs request and response payloads at `trace`.
    ///
    /// Responses such as full blocks can be large.
    pub fn with_payloads(mut self) -> Self {
        self.payloads = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            chain_id: self.chain_id,
            payloads: self.payloads,
        }
    }
}

/// A Tower service that logs node RPC requests and responses.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    chain_id: Option<u64>,
    payloads: bool,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let payloads = self.payloads;
        let mut service = self.service.clone();
        let method = method_label(&request);

        let span = tracing::debug_span!(
            "chaingate.node_rpc",
            chain_id = ?self.chain_id,
            method = %method,
        );

        Box::pin(
            async move {
                if payloads {
                    trace!(request = ?request, "Node request");
                }

                let start = Instant::now();
                let result = service.call(request).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &result {
                    Ok(response) if payloads => {
                        trace!(duration_ms, response = ?response, "Node response");
                    }
                    Ok(_) => debug!(duration_ms, "Node response"),
                    Err(e) => warn!(duration_ms, error = %e, "Node request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Method name of a packet, or a batch summary.
fn method_label(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            many => format!("batch({} calls)", many.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layer_is_quiet() {
        let layer = LoggingLayer::new();
        assert_eq!(layer.chain_id, None);
        assert!(!layer.payloads);
    }

    #[test]
    fn test_for_chain_with_payloads() {
        let layer = LoggingLayer::for_chain(137).with_payloads();
        assert_eq!(layer.chain_id, Some(137));
        assert!(layer.payloads);
    }
}

//! End-to-end tests of the gateway context
//!
//! Registries load from snapshots written into a temporary data directory,
//! the cache lives in memory, and the explorer is a `wiremock` server.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Bytes, U256};
use chaingate::cache::MemoryBackend;
use chaingate::errors::{ErrorCategory, ExplorerError, RegistryError};
use chaingate::{Gateway, GatewayConfig, GatewayConfigBuilder, GatewayError, GasQuote, QueryParams};
use helpers::{explorer_chainlist, ok_envelope, rpc_registry_entries, MockNode};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn write_snapshots(server: &MockServer) -> TempDir {
    helpers::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join("explorer_chains.json"),
        explorer_chainlist(&server.uri()).to_string(),
    )
    .await
    .unwrap();
    tokio::fs::write(
        dir.path().join("chains.json"),
        rpc_registry_entries().to_string(),
    )
    .await
    .unwrap();
    dir
}

fn config(server: &MockServer, dir: &TempDir) -> GatewayConfig {
    GatewayConfigBuilder::new(helpers::API_KEY, "redis://127.0.0.1:6379/0")
        .data_dir(dir.path())
        .explorer_chainlist_url(format!("{}/v2/chainlist", server.uri()))
        .rpc_registry_url(format!("{}/chains.json", server.uri()))
        .rate_limit(10, Duration::from_secs(1))
        .cache_ttl(Duration::from_secs(30))
        .build()
}

#[tokio::test]
async fn test_gateway_serves_explorer_requests_from_snapshot_registries() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("chainid", "137"))
        .and(query_param("action", "balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!("31337"))))
        .expect(1)
        .mount(&server)
        .await;
    // Snapshots exist, so the chain lists are never fetched
    Mock::given(path("/v2/chainlist"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = write_snapshots(&server).await;
    let mut gateway = Gateway::with_backend(config(&server, &dir), Arc::new(MemoryBackend::new()))
        .await
        .unwrap();

    assert_eq!(gateway.explorer_registry().len(), 2);
    assert_eq!(gateway.rpc_registry().len(), 2);
    assert_eq!(gateway.cache().backend_name(), "memory");
    assert_eq!(gateway.rate_limiter().max_calls(), 10);

    let selected = gateway.set_chain(137).unwrap();
    assert_eq!(selected.chain_id(), 137);

    let params = QueryParams::new()
        .with("address", "0xA")
        .with("tag", "latest");
    let first = gateway.request("account", "balance", params.clone()).await.unwrap();
    let second = gateway.request("account", "balance", params).await.unwrap();

    assert_eq!(first, json!("31337"));
    assert_eq!(second, first);
    assert_eq!(gateway.cache().stats().hits, 1);
}

#[tokio::test]
async fn test_gateway_requires_chain_selection() {
    let server = MockServer::start().await;
    let dir = write_snapshots(&server).await;
    let gateway = Gateway::with_backend(config(&server, &dir), Arc::new(MemoryBackend::new()))
        .await
        .unwrap();

    let err = gateway
        .request("stats", "ethprice", QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerError::NoChainSelected));
}

#[tokio::test]
async fn test_gateway_rejects_unknown_chain() {
    let server = MockServer::start().await;
    let dir = write_snapshots(&server).await;
    let mut gateway = Gateway::with_backend(config(&server, &dir), Arc::new(MemoryBackend::new()))
        .await
        .unwrap();

    let err = gateway.set_chain(424242).unwrap_err();
    assert!(matches!(
        err,
        ExplorerError::Registry(RegistryError::ChainNotSupported { chain_id: 424242 })
    ));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_gateway_assembles_through_pooled_node() {
    let server = MockServer::start().await;
    let dir = write_snapshots(&server).await;
    let gateway = Gateway::with_backend(config(&server, &dir), Arc::new(MemoryBackend::new()))
        .await
        .unwrap();

    let node = Arc::new(
        MockNode::new()
            .with_nonce(3)
            .with_base_fee(Some(50))
            .with_rewards(Some(vec![vec![2, 4]])),
    );
    gateway.node_pool().insert(1, node);

    let quote = gateway.get_gas_price(1, "normal").await.unwrap();
    assert_eq!(
        quote,
        GasQuote::Eip1559 {
            max_priority_fee_per_gas: 3,
            max_fee_per_gas: 103,
        }
    );

    let tx = gateway
        .assemble_transaction(
            1,
            address!("0x1111111111111111111111111111111111111111"),
            address!("0x2222222222222222222222222222222222222222"),
            U256::from(10u64),
            Bytes::new(),
            "slow",
        )
        .await
        .unwrap();
    assert_eq!(tx.nonce, 3);
    assert_eq!(tx.data, None);
}

#[tokio::test]
async fn test_gateway_rejects_invalid_config() {
    let server = MockServer::start().await;
    let dir = write_snapshots(&server).await;
    let mut config = config(&server, &dir);
    config.explorer_api_key = "  ".to_string();

    let err = Gateway::with_backend(config, Arc::new(MemoryBackend::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Config(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_gateway_without_snapshot_or_source_fails() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/chainlist"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = Gateway::with_backend(config(&server, &dir), Arc::new(MemoryBackend::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Registry(RegistryError::Fetch(_))));
    assert_eq!(err.category(), ErrorCategory::Transport);
}

//! Explorer client tests against a mock explorer API
//!
//! Every test runs a `wiremock` server standing in for the explorer and
//! checks the request that reached it as well as the classified result.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chaingate::errors::{ErrorCategory, ExplorerError, TransportError};
use chaingate::explorer::{BlockRange, LogQuery, Page, TopicOperator};
use chaingate::{ChainRegistry, QueryParams, RateLimiter};
use helpers::{explorer_chainlist, explorer_client, explorer_client_with_limiter, ok_envelope};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae";

#[tokio::test]
async fn test_balance_is_cached_after_first_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/api"))
        .and(query_param("chainid", "1"))
        .and(query_param("module", "account"))
        .and(query_param("action", "balance"))
        .and(query_param("apikey", helpers::API_KEY))
        .and(query_param("address", ADDRESS))
        .and(query_param("tag", "latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!("1000"))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, backend) = explorer_client(&server.uri());

    let first = client.accounts().balance(ADDRESS, None).await.unwrap();
    let second = client.accounts().balance(ADDRESS, None).await.unwrap();

    assert_eq!(first, json!("1000"));
    assert_eq!(second, json!("1000"));
    assert_eq!(backend.len().await, 1);

    let stats = client.cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.writes, 1);
}

#[tokio::test]
async fn test_disallowed_params_never_reach_upstream() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!("5"))))
        .mount(&server)
        .await;

    let (client, _) = explorer_client(&server.uri());
    let params = QueryParams::new()
        .with("address", ADDRESS)
        .with("tag", "latest")
        .with("evil_param", "drop table");
    let result = client.request("account", "balance", params).await.unwrap();
    assert_eq!(result, json!("5"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(key, _)| key.into_owned())
        .collect();
    assert!(!keys.iter().any(|key| key == "evil_param"));
    assert!(keys.iter().any(|key| key == "address"));
}

#[tokio::test]
async fn test_notok_response_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        })))
        .mount(&server)
        .await;

    let (client, backend) = explorer_client(&server.uri());
    let err = client.accounts().balance(ADDRESS, None).await.unwrap_err();

    match err {
        ExplorerError::Upstream { message, detail } => {
            assert_eq!(message, "NOTOK");
            assert_eq!(detail, "Invalid API Key");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert!(backend.is_empty().await, "errors must not be cached");
}

#[tokio::test]
async fn test_non_200_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (client, _) = explorer_client(&server.uri());
    let err = client.stats().eth_price().await.unwrap_err();

    match err {
        ExplorerError::Transport(TransportError::Status { status, url }) => {
            assert_eq!(status, 502);
            assert!(!url.contains(helpers::API_KEY), "api key leaked: {url}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_explorer_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!("1")))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let (client, backend) = explorer_client(&server.uri());
    let client = client.with_timeout(Duration::from_millis(100));
    let err = client.accounts().balance(ADDRESS, None).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Transport);
    let message = err.to_string();
    assert!(!message.contains(helpers::API_KEY), "api key leaked: {message}");
    match err {
        ExplorerError::Transport(TransportError::Timeout { url, timeout }) => {
            assert_eq!(timeout, Duration::from_millis(100));
            assert!(!url.contains(helpers::API_KEY), "api key leaked: {url}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_proxy_checks_jsonrpc_version() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "eth_blockNumber"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "1.0",
            "id": 83,
            "result": "0x10"
        })))
        .mount(&server)
        .await;

    let (client, _) = explorer_client(&server.uri());
    let err = client.proxy().block_number().await.unwrap_err();
    assert!(matches!(err, ExplorerError::ProtocolVersion { version } if version == "1.0"));
}

#[tokio::test]
async fn test_proxy_returns_jsonrpc_result() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("module", "proxy"))
        .and(query_param("action", "eth_blockNumber"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 83,
            "result": "0x1234"
        })))
        .mount(&server)
        .await;

    let (client, _) = explorer_client(&server.uri());
    assert_eq!(client.proxy().block_number().await.unwrap(), json!("0x1234"));
}

#[tokio::test]
async fn test_raw_transaction_broadcast_is_never_cached() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "eth_sendRawTransaction"))
        .and(query_param("hex", "0xf86b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "0xabc"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (client, backend) = explorer_client(&server.uri());
    client.proxy().send_raw_transaction("0xf86b").await.unwrap();
    client.proxy().send_raw_transaction("0xf86b").await.unwrap();

    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_invalidate_chain_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "ethsupply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!("120000000"))))
        .expect(2)
        .mount(&server)
        .await;

    let (client, backend) = explorer_client(&server.uri());
    client.stats().eth_supply().await.unwrap();
    client.stats().eth_supply().await.unwrap();

    assert_eq!(client.invalidate_chain().await.unwrap(), 1);
    assert!(backend.is_empty().await);

    client.stats().eth_supply().await.unwrap();
}

#[tokio::test]
async fn test_get_logs_sends_topics_and_operators() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("module", "logs"))
        .and(query_param("action", "getLogs"))
        .and(query_param("fromBlock", "100"))
        .and(query_param("toBlock", "200"))
        .and(query_param("topic0", "0xddf2"))
        .and(query_param("topic1", "0x0000"))
        .and(query_param("topic0_1_opr", "and"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = explorer_client(&server.uri());
    let query = LogQuery::new(BlockRange::new(100, 200))
        .address(ADDRESS)
        .topic(0, "0xddf2")
        .topic(1, "0x0000")
        .operator(1, 0, TopicOperator::And)
        .page(Page::new(1, 1000));

    assert_eq!(client.logs().get_logs(&query).await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_unknown_action_fails_before_any_request() {
    let server = MockServer::start().await;
    let (client, _) = explorer_client(&server.uri());

    let err = client
        .request("account", "mysteryaction", QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExplorerError::UnknownAction { action } if action == "mysteryaction"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_switching_chain_changes_chainid_and_cache_key() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "ethprice"))
        .and(query_param("chainid", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"ethusd": "1"}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/v2/api"))
        .and(query_param("action", "ethprice"))
        .and(query_param("chainid", "137"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"ethusd": "2"}))))
        .expect(1)
        .mount(&server)
        .await;

    let (mut client, backend) = explorer_client(&server.uri());
    assert_eq!(client.stats().eth_price().await.unwrap(), json!({"ethusd": "1"}));

    client.select_chain(137).unwrap();
    assert_eq!(client.chain_id(), Some(137));
    assert_eq!(client.stats().eth_price().await.unwrap(), json!({"ethusd": "2"}));

    assert_eq!(backend.len().await, 2);
}

#[tokio::test]
async fn test_requests_share_the_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(path("/v2/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!("1"))))
        .mount(&server)
        .await;

    let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(300)).unwrap());
    let (client, _) = explorer_client_with_limiter(&server.uri(), limiter.clone());

    let start = std::time::Instant::now();
    client.stats().eth_supply().await.unwrap();
    client.stats().eth_price().await.unwrap();
    // Cache hits are still admitted through the limiter
    client.stats().eth_price().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(590));
}

#[tokio::test]
async fn test_chain_list_refreshes_registry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/chainlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(explorer_chainlist(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ChainRegistry::new(
        "explorer",
        format!("{}/v2/chainlist", server.uri()),
        dir.path().join("explorer_chains.json"),
    ));
    let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(1)).unwrap());
    let cache = chaingate::cache::CacheGateway::new(Arc::new(
        chaingate::cache::MemoryBackend::new(),
    ));
    let client = chaingate::ExplorerClient::new(registry.clone(), limiter, cache, "KEY");

    let chains = client.usage().chain_list().await.unwrap();

    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].chain_id, 1);
    assert_eq!(chains[1].chain_name, "Polygon Mainnet");
    assert!(dir.path().join("explorer_chains.json").exists());
}

//! Integration tests using mock HTTP server
//!
//! Tests the full flow: client façade → rate limiter → dispatcher → typed records

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use trongrid::models::{BroadcastHexRequest, TriggerConstantContractRequest};
use trongrid::{
    ClientConfig, CursorState, Error, ErrorKind, QueryOptions, RateLimit, RateLimiterConfig,
    TronGridClient,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TronGridClient {
    TronGridClient::new(ClientConfig::builder().base_url(server.uri()).build()).unwrap()
}

fn tx(id: &str) -> serde_json::Value {
    json!({"txID": id, "blockNumber": 1, "block_timestamp": 1_700_000_000_000_i64})
}

#[derive(Default)]
struct CountingLimiter {
    waits: AtomicUsize,
}

#[async_trait]
impl RateLimit for CountingLimiter {
    async fn wait(&self, _ctx: &CancellationToken) -> trongrid::Result<()> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Single-shot endpoints
// ============================================================================

#[tokio::test]
async fn test_get_now_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getnowblock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blockID": "0000000003b1e6a1",
            "block_header": {"raw_data": {"number": 62_000_801, "timestamp": 1}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let block = client.get_now_block(&CancellationToken::new()).await.unwrap();

    assert_eq!(block.number(), Some(62_000_801));
}

#[tokio::test]
async fn test_get_now_block_without_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getnowblock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_now_block(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoData { .. }));
}

#[tokio::test]
async fn test_get_block_by_number_sends_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getblockbynum"))
        .and(header("TRON-PRO-API-KEY", "key-1"))
        .and(body_json(json!({"num": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blockID": "07",
            "block_header": {"raw_data": {"number": 7}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TronGridClient::new(
        ClientConfig::builder()
            .base_url(mock_server.uri())
            .api_key("key-1")
            .build(),
    )
    .unwrap();

    let block = client
        .get_block_by_number(&CancellationToken::new(), 7)
        .await
        .unwrap();
    assert_eq!(block.block_id, "07");
}

#[tokio::test]
async fn test_get_account() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TAddr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"address": "41aa", "balance": 5}],
            "success": true,
            "meta": {"at": 1, "page_size": 1}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let account = client
        .get_account(&CancellationToken::new(), "TAddr")
        .await
        .unwrap();

    assert_eq!(account.balance, 5);
}

#[tokio::test]
async fn test_get_account_empty_and_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TEmpty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "success": true
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TBad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "invalid address"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ctx = CancellationToken::new();

    let empty = client.get_account(&ctx, "TEmpty").await.unwrap_err();
    assert!(matches!(empty, Error::NoData { .. }));

    let rejected = client.get_account(&ctx, "TBad").await.unwrap_err();
    assert_eq!(rejected.kind(), ErrorKind::ServiceRejected);
    assert_eq!(
        rejected.to_string(),
        "Service rejected request: invalid address"
    );
}

#[tokio::test]
async fn test_get_account_rejected_with_client_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TBad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "invalid address",
            "statusCode": 400
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_account(&CancellationToken::new(), "TBad")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceRejected);
    assert_eq!(err.to_string(), "Service rejected request: invalid address");
}

#[tokio::test]
async fn test_get_account_address_stays_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/T1%3Fonly_to=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"address": "41aa"}],
            "success": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let account = client
        .get_account(&CancellationToken::new(), "T1?only_to=true")
        .await
        .unwrap();

    assert_eq!(account.address, "41aa");
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_get_account_balance_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getaccountbalance"))
        .and(body_json(json!({
            "account_identifier": {"address": "TAddr"},
            "block_identifier": {"number": 100, "hash": "00ab"},
            "visible": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": 42,
            "block_identifier": {"hash": "00ab", "number": 100}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let balance = client
        .get_account_balance(&CancellationToken::new(), "TAddr", 100, "00ab")
        .await
        .unwrap();

    assert_eq!(balance.balance, 42);
    assert_eq!(balance.block_identifier.number, 100);
}

#[tokio::test]
async fn test_get_transaction_info_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/gettransactioninfobyid"))
        .and(body_json(json!({"value": "abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "fee": 1100,
            "blockNumber": 9,
            "receipt": {"net_usage": 268, "result": "SUCCESS"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let info = client
        .get_transaction_info_by_id(&CancellationToken::new(), "abc")
        .await
        .unwrap();

    assert_eq!(info.fee, 1100);
    assert_eq!(info.receipt.result, "SUCCESS");
}

#[tokio::test]
async fn test_trigger_constant_contract_and_broadcast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/triggerconstantcontract"))
        .and(body_json(json!({
            "owner_address": "TOwner",
            "contract_address": "TContract",
            "function_selector": "balanceOf(address)",
            "parameter": "00",
            "visible": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"result": true},
            "energy_used": 935,
            "constant_result": ["000000000000000000000000000000000000000000000000000000000000002a"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/wallet/broadcasthex"))
        .and(body_json(json!({"transaction": "0a02"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "txid": "77ddfa"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ctx = CancellationToken::new();

    let call = client
        .trigger_constant_contract(
            &ctx,
            &TriggerConstantContractRequest {
                owner_address: "TOwner".to_string(),
                contract_address: "TContract".to_string(),
                function_selector: "balanceOf(address)".to_string(),
                parameter: "00".to_string(),
                visible: true,
            },
        )
        .await
        .unwrap();
    assert!(call.result.result);
    assert_eq!(call.energy_used, 935);

    let broadcast = client
        .broadcast_hex(
            &ctx,
            &BroadcastHexRequest {
                transaction: "0a02".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(broadcast.result);
    assert_eq!(broadcast.txid, "77ddfa");
}

#[tokio::test]
async fn test_single_shot_cancelled_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = TronGridClient::new(
        ClientConfig::builder()
            .base_url(mock_server.uri())
            .rate_limit(RateLimiterConfig::new(10, 10))
            .build(),
    )
    .unwrap();

    let ctx = CancellationToken::new();
    ctx.cancel();

    let err = client.get_block_by_number(&ctx, 1).await.unwrap_err();
    assert!(err.is_cancelled_or_timed_out());
}

#[tokio::test]
async fn test_http_error_status_surfaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getnowblock"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get_now_block(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 429, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_caller_supplied_http_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getnowblock"))
        .and(header("user-agent", "indexer/2.0"))
        .and(header("x-request-source", "batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blockID": "01",
            "block_header": {"raw_data": {"number": 7}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "x-request-source",
        reqwest::header::HeaderValue::from_static("batch"),
    );
    let http = reqwest::Client::builder()
        .user_agent("indexer/2.0")
        .default_headers(headers)
        .build()
        .unwrap();

    let client = TronGridClient::with_http_client(
        ClientConfig::builder().base_url(mock_server.uri()).build(),
        http,
    )
    .unwrap();
    let block = client.get_now_block(&CancellationToken::new()).await.unwrap();

    assert_eq!(block.number(), Some(7));
}

#[test]
fn test_caller_supplied_http_client_still_validates_config() {
    let result = TronGridClient::with_http_client(
        ClientConfig::builder().base_url("ftp://example.com").build(),
        reqwest::Client::new(),
    );
    assert!(matches!(result, Err(Error::Config { .. })));
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_account_transactions_across_pages() {
    let mock_server = MockServer::start().await;
    let page2_url = format!("{}/v1/accounts/TAddr/transactions?fingerprint=fp2&limit=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TAddr/transactions"))
        .and(query_param("limit", "2"))
        .and(query_param("fingerprint", "fp2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [tx("tx3")],
            "success": true,
            "meta": {"page_size": 1, "links": {"next": ""}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TAddr/transactions"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [tx("tx1"), tx("tx2")],
            "success": true,
            "meta": {"page_size": 2, "fingerprint": "fp2", "links": {"next": page2_url}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let limiter = Arc::new(CountingLimiter::default());
    let client = client_for(&mock_server).with_rate_limiter(limiter.clone());
    let ctx = CancellationToken::new();

    let mut cursor = client
        .get_account_transactions("TAddr", &QueryOptions::new().limit(2))
        .unwrap();

    let mut ids = Vec::new();
    while cursor.advance(&ctx).await {
        ids.push(cursor.current().unwrap().unwrap().tx_id.clone());
    }

    assert_eq!(ids, vec!["tx1", "tx2", "tx3"]);
    assert!(cursor.current().unwrap().is_none());
    assert_eq!(cursor.state(), CursorState::ExhaustedTerminal);
    assert_eq!(cursor.fetch_count(), 2);
    assert_eq!(limiter.waits.load(Ordering::SeqCst), 2);

    // Terminal state is idempotent
    assert!(!cursor.advance(&ctx).await);
    assert_eq!(cursor.fetch_count(), 2);
}

#[tokio::test]
async fn test_contract_transactions_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TAddr/transactions/trc20"))
        .and(query_param("contract_address", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"))
        .and(query_param("order_by", "block_timestamp,asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"transaction_id": "a", "type": "Transfer", "value": "1"},
                {"transaction_id": "b", "type": "Approval", "value": "0"}
            ],
            "success": true,
            "meta": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = QueryOptions::new()
        .contract_address("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t")
        .order_by("block_timestamp,asc");

    let cursor = client
        .get_contract_transactions("TAddr", "trc20", &options)
        .unwrap();
    let kinds: Vec<String> = cursor
        .into_stream(CancellationToken::new())
        .map(|item| item.unwrap().kind)
        .collect()
        .await;

    assert_eq!(kinds, vec!["Transfer", "Approval"]);
}

#[tokio::test]
async fn test_listing_rejection_reported_not_truncated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/TAddr/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [tx("hidden")],
            "success": false
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let ctx = CancellationToken::new();
    let mut cursor = client
        .get_account_transactions("TAddr", &QueryOptions::new())
        .unwrap();

    assert!(!cursor.advance(&ctx).await);
    let err = cursor.current().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceRejected);
}

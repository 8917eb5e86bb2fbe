//! Relayer client tests against a `wiremock` server.

use std::time::Duration;

use serde_json::{json, Value};
use tomox::{NewOrder, Side, Tomox, TomoxConfig, TomoxError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const EXCHANGE: &str = "0x00000000000000000000000000000000000000ee";
const BASE: &str = "0x4d7eA2cE949216D6b120f3AA10164173615A2b6C";
const QUOTE: &str = "0x0000000000000000000000000000000000000001";

fn config(server: &MockServer) -> TomoxConfig {
    TomoxConfig {
        relayer_url: server.uri(),
        exchange_address: Some(EXCHANGE.into()),
        timeout: Duration::from_secs(5),
    }
}

async fn mount_json(server: &MockServer, http_method: &str, route: &str, body: Value) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_token_decimals(server: &MockServer) {
    for token in [BASE, QUOTE] {
        mount_json(
            server,
            "GET",
            &format!("/api/tokens/{token}"),
            json!({"data": {"symbol": "T", "address": token, "decimals": 18}}),
        )
        .await;
    }
}

fn order(side: Side, price: &str, nonce: Option<u64>) -> NewOrder {
    NewOrder {
        base_token: BASE.into(),
        quote_token: QUOTE.into(),
        price: price.into(),
        amount: "1.00000".into(),
        side,
        nonce,
    }
}

async fn posted_bodies(server: &MockServer, route: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == route)
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn test_connect_fetches_exchange_address() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/info",
        json!({"data": {"exchangeAddress": EXCHANGE, "fee": "0.001"}}),
    )
    .await;

    let mut cfg = config(&server);
    cfg.exchange_address = None;
    let client = Tomox::connect(cfg, TEST_KEY).await.unwrap();
    assert_eq!(
        client.exchange_address,
        EXCHANGE.parse::<alloy_primitives::Address>().unwrap()
    );
}

#[tokio::test]
async fn test_order_book_null_data_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orderbook"))
        .and(query_param("baseToken", BASE))
        .and(query_param("quoteToken", QUOTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    assert!(client.get_order_book(BASE, QUOTE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_envelope_without_data_key_is_none() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/pair", json!({})).await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    assert!(client.get_pair(BASE, QUOTE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_relayer_error_envelope_surfaces() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/orders", json!({"error": "pair not found"})).await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    let err = client.get_orders(BASE, QUOTE).await.unwrap_err();
    assert!(matches!(err, TomoxError::Relayer(ref m) if m == "pair not found"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    let err = client.get_orders(BASE, QUOTE).await.unwrap_err();
    assert!(matches!(err, TomoxError::Http { status: 503, .. }));
}

#[tokio::test]
async fn test_create_many_orders_assigns_sequential_nonces() {
    let server = MockServer::start().await;
    mount_token_decimals(&server).await;
    mount_json(&server, "GET", "/api/orders/nonce", json!({"data": "17"})).await;
    mount_json(
        &server,
        "POST",
        "/api/orders/bulk",
        json!({"data": [{"hash": "0xa", "nonce": 17}, {"hash": "0xb", "nonce": 18}]}),
    )
    .await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    let placed = client
        .create_many_orders(&[order(Side::Buy, "0.99", None), order(Side::Buy, "0.98", None)])
        .await
        .unwrap();

    assert_eq!(placed.len(), 2);
    assert_eq!(placed[1].hash, "0xb");

    let bodies = posted_bodies(&server, "/api/orders/bulk").await;
    assert_eq!(bodies.len(), 1);
    let batch = bodies[0].as_array().unwrap();
    assert_eq!(batch[0]["nonce"], "17");
    assert_eq!(batch[1]["nonce"], "18");
    assert_eq!(batch[0]["pricepoint"], "990000000000000000");
    assert_eq!(batch[0]["amount"], "1000000000000000000");
    assert_eq!(batch[0]["type"], "LO");
    assert_eq!(batch[0]["status"], "NEW");
}

#[tokio::test]
async fn test_create_order_keeps_explicit_nonce() {
    let server = MockServer::start().await;
    mount_token_decimals(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/nonce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": 1})))
        .expect(0)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "POST",
        "/api/orders",
        json!({"data": {"hash": "0xc", "nonce": 5}}),
    )
    .await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    let placed = client
        .create_order(&order(Side::Sell, "1.01", Some(5)))
        .await
        .unwrap();
    assert_eq!(placed.hash, "0xc");

    let bodies = posted_bodies(&server, "/api/orders").await;
    assert_eq!(bodies[0]["nonce"], "5");
    assert_eq!(bodies[0]["side"], "SELL");
}

#[tokio::test]
async fn test_token_decimals_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/tokens/{QUOTE}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"symbol": "TOMO"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    assert_eq!(client.token_decimals(QUOTE).await.unwrap(), 18);
    assert_eq!(client.token_decimals(QUOTE).await.unwrap(), 18);
}

#[tokio::test]
async fn test_cancel_many_orders_uses_one_request() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/orders/nonce", json!({"data": 3})).await;
    mount_json(&server, "POST", "/api/orders/cancel/bulk", json!({"data": "ok"})).await;

    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    let hashes = vec![format!("0x{}", "11".repeat(32)), format!("0x{}", "22".repeat(32))];
    client.cancel_many_orders(&hashes).await.unwrap();

    let bodies = posted_bodies(&server, "/api/orders/cancel/bulk").await;
    assert_eq!(bodies.len(), 1);
    let cancels = bodies[0].as_array().unwrap();
    assert_eq!(cancels[0]["orderHash"], hashes[0]);
    assert_eq!(cancels[0]["nonce"], "3");
    assert_eq!(cancels[1]["nonce"], "4");
}

#[tokio::test]
async fn test_cancel_many_orders_empty_is_noop() {
    let server = MockServer::start().await;
    let client = Tomox::connect(config(&server), TEST_KEY).await.unwrap();
    client.cancel_many_orders(&[]).await.unwrap();
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

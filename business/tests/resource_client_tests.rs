//! Resource client behaviour against a mock backend.

#![cfg(not(target_arch = "wasm32"))]

mod common;

use std::time::Duration;

use billing_business::actions::fetch_binary;
use billing_business::{
    Method, Payload, Plan, RequestError, RequestOptions, Resource, ResourceClient,
};
use common::{TestContext, plan, settle};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn immediate_client_loads_collection() {
    let ctx = TestContext::new().await;
    ctx.mock_list("/plans", json!([plan(1, "Basic", 49.9), plan(4, "Gold", 99.9)]))
        .await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::default());
    assert!(client.loading(), "loading is set before the response arrives");
    assert!(client.data().is_none());

    settle(&mut client).await;

    assert!(!client.loading());
    assert!(client.error().is_none());
    assert_eq!(client.version(), 1);
    let names: Vec<&str> = client.rows().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Basic", "Gold"]);
    assert!(client.rows()[1].created_at.is_some());
}

#[tokio::test]
async fn failure_keeps_previous_data() {
    let ctx = TestContext::new().await;
    ctx.mock_list_once("/plans", json!([plan(1, "Basic", 49.9)]))
        .await;
    ctx.mock_status("GET", "/plans", 500).await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::default());
    settle(&mut client).await;
    assert_eq!(client.rows().len(), 1);

    let result = client.handle().fetch().await;
    assert_eq!(
        result,
        Err(RequestError::Status {
            method: Method::Get,
            status: 500
        })
    );

    settle(&mut client).await;
    assert_eq!(client.error(), Some("GET failed: 500"));
    assert_eq!(client.rows().len(), 1);
    assert_eq!(client.version(), 1);
}

#[tokio::test]
async fn success_after_failure_clears_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/plans"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&ctx.mock_server)
        .await;
    ctx.mock_list("/plans", json!([plan(2, "Silver", 59.0)])).await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::default());
    settle(&mut client).await;
    assert_eq!(client.error(), Some("GET failed: 503"));
    assert!(client.data().is_none());

    client.refresh();
    assert!(client.loading());
    settle(&mut client).await;
    assert!(client.error().is_none());
    assert_eq!(client.rows()[0].name, "Silver");
}

#[tokio::test]
async fn schema_mismatch_is_a_decode_failure() {
    let ctx = TestContext::new().await;
    ctx.mock_list("/plans", json!([{"id": "one", "name": "Basic"}]))
        .await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::deferred());
    let result = client.handle().fetch().await;
    assert!(matches!(
        result,
        Err(RequestError::Decode {
            method: Method::Get,
            ..
        })
    ));

    settle(&mut client).await;
    assert!(
        client
            .error()
            .is_some_and(|e| e.starts_with("GET failed: invalid response"))
    );
    assert!(client.data().is_none());
}

#[tokio::test]
async fn stale_response_never_overwrites_newer_one() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/plans"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([plan(1, "Old", 1.0)]))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&ctx.mock_server)
        .await;
    ctx.mock_list("/plans", json!([plan(1, "New", 2.0)])).await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::default());
    // Let the slow request reach the server before issuing the fast one.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = client.handle().fetch().await;
    assert!(fast.is_ok());
    settle(&mut client).await;
    assert_eq!(client.rows()[0].name, "New");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!client.sync());
    assert_eq!(client.rows()[0].name, "New");
    assert_eq!(client.version(), 1);
}

#[tokio::test]
async fn dropped_client_ignores_late_response() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/plans"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([plan(1, "Late", 1.0)]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&ctx.mock_server)
        .await;

    let client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::deferred());
    let handle = client.handle();
    let in_flight = tokio::spawn(handle.fetch());
    tokio::time::sleep(Duration::from_millis(50)).await;

    drop(client);
    assert!(handle.is_closed());

    let result = in_flight.await.expect("task should not panic");
    assert_eq!(result, Err(RequestError::Cancelled { method: Method::Get }));

    // New requests from a surviving handle are refused outright.
    assert!(matches!(
        handle.fetch().await,
        Err(RequestError::Cancelled { .. })
    ));
}

#[tokio::test]
async fn post_wraps_body_and_leaves_collection_alone() {
    let ctx = TestContext::new().await;
    ctx.mock_list("/plans", json!([plan(1, "Basic", 49.9)])).await;
    Mock::given(method("POST"))
        .and(path("/plans"))
        .and(body_json(json!({"plan": {"name": "Gold", "price": 99.9}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(plan(4, "Gold", 99.9)))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&ctx.config, RequestOptions::default());
    settle(&mut client).await;

    let payload = client
        .request(
            Method::Post,
            Some(json!({"plan": {"name": "Gold", "price": 99.9}})),
            None,
        )
        .await
        .expect("create succeeds");
    assert_eq!(payload.as_json().and_then(|v| v["id"].as_i64()), Some(4));

    settle(&mut client).await;
    assert_eq!(client.rows().len(), 1);
    assert_eq!(client.version(), 1);
}

#[tokio::test]
async fn immediate_options_issue_the_configured_request() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut client: ResourceClient<Value> = ctx.client(
        Resource::Customers,
        RequestOptions {
            method: Method::Post,
            body: Some(json!({"customer": {"name": "Ana", "age": 30}})),
            immediate: true,
        },
    );
    settle(&mut client).await;

    assert!(client.error().is_none());
    assert!(client.data().is_none());
}

#[tokio::test]
async fn binary_member_is_returned_raw() {
    let ctx = TestContext::new().await;
    let pdf = b"%PDF-1.4 booklet".to_vec();
    Mock::given(method("GET"))
        .and(path("/booklets/12"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"),
        )
        .mount(&ctx.mock_server)
        .await;

    let mut booklets: ResourceClient<Value> =
        ctx.client(Resource::Booklets, RequestOptions::deferred());

    let payload = booklets
        .request(Method::Get, None, Some(12))
        .await
        .expect("booklet fetch succeeds");
    assert_eq!(payload, Payload::Binary(pdf.clone()));

    let bytes = fetch_binary(booklets.handle(), 12).await.expect("fetch");
    assert_eq!(bytes, Some(pdf));

    settle(&mut booklets).await;
    assert!(booklets.error().is_none());
    assert!(booklets.data().is_none());
}

#[tokio::test]
async fn transport_failure_names_the_method() {
    // Nothing listens on port 9.
    let config = billing_business::BusinessConfig::new("http://127.0.0.1:9");
    let mut client: ResourceClient<Plan> =
        ResourceClient::for_record(&config, RequestOptions::deferred());

    let result = client.request(Method::Delete, None, Some(1)).await;
    assert!(matches!(
        result,
        Err(RequestError::Transport {
            method: Method::Delete,
            ..
        })
    ));

    settle(&mut client).await;
    assert!(
        client
            .error()
            .is_some_and(|e| e.starts_with("DELETE failed: "))
    );
}

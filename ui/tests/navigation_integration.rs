//! Navigation between pages of the console.

#![cfg(not(target_arch = "wasm32"))]

mod common;

use std::time::Duration;

use billing_ui::Route;
use common::TestCtx;
use kittest::Queryable;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn starts_on_customers_and_loads_them() {
    let mut ctx = TestCtx::new().await;
    ctx.mock_list("/customers", json!([{"id": 1, "name": "Ana", "age": 30}]))
        .await;
    ctx.start(Route::default());

    ctx.step_until(|harness| harness.query_by_label("Ana").is_some())
        .await;
    assert_eq!(ctx.harness().state().route(), Route::Customers);
    assert!(ctx.harness().query_by_label("Criar Cliente:").is_some());
}

#[tokio::test]
async fn nav_bar_switches_page_and_fetches_its_resource() {
    let mut ctx = TestCtx::new().await;
    ctx.mock_list("/customers", json!([])).await;
    ctx.mock_list(
        "/plans",
        json!([{"id": 4, "name": "Gold", "price": "99.90"}]),
    )
    .await;
    ctx.start(Route::Customers);
    ctx.harness_mut().step();

    ctx.harness().get_by_label("Planos").click();
    ctx.step_until(|harness| harness.query_by_label("Gold").is_some())
        .await;

    assert_eq!(ctx.harness().state().route(), Route::Plans);
    assert!(ctx.harness().query_by_label("R$ 99,90").is_some());
    assert!(ctx.harness().query_by_label("Criar Plano:").is_some());
}

#[tokio::test]
async fn leaving_a_page_discards_its_late_response() {
    let mut ctx = TestCtx::new().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "name": "Ana", "age": 30}]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(ctx.mock_server())
        .await;
    ctx.mock_list("/adicional_services", json!([])).await;
    ctx.start(Route::Customers);
    ctx.harness_mut().step();

    ctx.harness().get_by_label("Serviços Adicionais").click();
    ctx.harness_mut().step();
    assert_eq!(ctx.harness().state().route(), Route::Services);

    tokio::time::sleep(Duration::from_millis(400)).await;
    ctx.harness_mut().step();
    assert!(ctx.harness().query_by_label("Ana").is_none());
    assert!(ctx.harness().query_by_label("Nenhum registro.").is_some());
}

#[tokio::test]
async fn bills_page_starts_empty() {
    let mut ctx = TestCtx::new().await;
    ctx.mock_list("/customers", json!([])).await;
    ctx.mock_list("/subscriptions", json!([])).await;
    ctx.start(Route::Bills);

    ctx.step_until(|harness| harness.query_by_label("Nenhum boleto disponível.").is_some())
        .await;
    assert!(ctx.harness().query_by_label("Consulta de Boletos").is_some());
}

#[tokio::test]
async fn backend_failure_is_shown_with_retry() {
    let mut ctx = TestCtx::new().await;
    ctx.mock_status("GET", "/packages", 503).await;
    ctx.mock_list("/plans", json!([])).await;
    ctx.mock_list("/adicional_services", json!([])).await;
    ctx.start(Route::Packages);

    ctx.step_until(|harness| harness.query_by_label("GET failed: 503").is_some())
        .await;
    assert!(ctx.harness().query_by_label("Tentar novamente").is_some());
}

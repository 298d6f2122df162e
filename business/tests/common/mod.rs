//! Shared helpers for business-layer tests against a mock backend.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use billing_business::{BusinessConfig, RequestOptions, ResourceClient, Resource};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::{method, path}};

const TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestContext {
    pub mock_server: MockServer,
    pub config: BusinessConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri());
        Self {
            mock_server,
            config,
        }
    }

    pub fn client<T>(&self, resource: Resource, options: RequestOptions) -> ResourceClient<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        ResourceClient::new(&self.config, resource, options)
    }

    /// `GET path` answers `body` as JSON.
    pub async fn mock_list(&self, at: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    /// `GET path` answers `body` once; later calls fall through to other mocks.
    pub async fn mock_list_once(&self, at: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_status(&self, verb: &str, at: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

/// Sync `client` until no request is outstanding.
pub async fn settle<T>(client: &mut ResourceClient<T>)
where
    T: DeserializeOwned + Send + 'static,
{
    let start = Instant::now();
    loop {
        client.sync();
        if !client.loading() {
            return;
        }
        assert!(start.elapsed() < TIMEOUT, "timed out waiting for {:?}", client.resource());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Poll `done` until it returns true, yielding to spawned tasks in between.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    let start = Instant::now();
    while !done() {
        assert!(start.elapsed() < TIMEOUT, "timed out waiting for condition");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn plan(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "created_at": "2024-05-01T12:00:00.000Z",
        "updated_at": "2024-05-01T12:00:00.000Z"
    })
}

pub fn customer(id: i64, name: &str, age: i64) -> Value {
    json!({ "id": id, "name": name, "age": age })
}

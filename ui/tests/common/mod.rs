use std::time::Duration;

use billing_ui::state::State;
use billing_ui::{BillingApp, Route};
use egui_kittest::Harness;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a, T = BillingApp> {
    mock_server: MockServer,
    harness: Option<Harness<'a, T>>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        self.harness.as_mut().expect("call start() first")
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        self.harness.as_ref().expect("call start() first")
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Step until `done` holds, letting background requests land between frames.
    pub async fn step_until(&mut self, mut done: impl FnMut(&Harness<'a, T>) -> bool) {
        for _ in 0..100 {
            let harness = self.harness_mut();
            harness.step();
            if done(harness) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("condition not reached after 100 frames");
    }
}

impl TestCtx<'_, BillingApp> {
    /// A mock backend; mount responses before calling `start`.
    pub async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
            harness: None,
        }
    }

    /// Build the app on `route`. Its first page issues requests right away.
    pub fn start(&mut self, route: Route) {
        let state = State::test(self.mock_server.uri());
        let app = BillingApp::with_route(state, route);
        self.harness = Some(Harness::new_eframe(|_| app));
    }

    #[allow(unused)]
    pub async fn mock_list(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    #[allow(unused)]
    pub async fn mock_status(&self, http_method: &str, route: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

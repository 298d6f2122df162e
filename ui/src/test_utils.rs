//! Harness helpers for widget and page tests.

use billing_business::{Customer, Plan};
use egui_kittest::Harness;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::MockServer;

use crate::state::State;

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Step until `done` holds, letting background requests land between frames.
    pub async fn step_until(&mut self, mut done: impl FnMut(&Harness<'a, T>) -> bool) {
        for _ in 0..100 {
            self.harness.step();
            if done(&self.harness) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("condition not reached after 100 frames");
    }
}

impl<'a> TestCtx<'a, State> {
    /// A harness drawing `app` against an empty mock backend.
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let mock_server = MockServer::start().await;
        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(app, state);
        Self {
            mock_server,
            harness,
        }
    }
}

pub fn plan_rows(count: i64) -> Vec<Plan> {
    (1..=count)
        .map(|id| Plan {
            id,
            name: format!("Plan {id}"),
            price: id as f64 * 10.0,
            created_at: None,
            updated_at: None,
        })
        .collect()
}

pub fn customer_rows(names: &[&str]) -> Vec<Customer> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| Customer {
            id,
            name: (*name).to_string(),
            age: 30,
            created_at: None,
            updated_at: None,
        })
        .collect()
}

pub fn plan_json(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z"
    })
}

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod pages;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::{BillingApp, Route};

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod test_utils;

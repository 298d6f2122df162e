//! One page per route. Each page owns the resource clients it reads, so leaving a
//! page drops them and cancels whatever they still had in flight.

mod bills;
mod customers;
mod listing;
mod lookup;
mod packages;
mod pending;
mod priced;
mod subscriptions;

pub use bills::BillsPage;
pub use customers::CustomersPage;
pub use packages::PackagesPage;
pub use priced::{PlansPage, ServicesPage};
pub use subscriptions::SubscriptionsPage;

use billing_business::{BusinessConfig, Mutation, Record, RequestError};
use egui::{Frame, Margin, Ui};
use serde::Serialize;

use crate::app::Route;
use crate::widgets::form_error;

pub trait Page {
    fn ui(&mut self, ui: &mut Ui);

    /// Whether requests are still in flight, so the app keeps repainting.
    fn is_busy(&self) -> bool;
}

pub fn page_for(route: Route, config: &BusinessConfig) -> Box<dyn Page> {
    match route {
        Route::Customers => Box::new(CustomersPage::new(config)),
        Route::Plans => Box::new(PlansPage::new(config)),
        Route::Services => Box::new(ServicesPage::new(config)),
        Route::Packages => Box::new(PackagesPage::new(config)),
        Route::Subscriptions => Box::new(SubscriptionsPage::new(config)),
        Route::Bills => Box::new(BillsPage::new(config)),
    }
}

/// A titled create form ending in a submit button labelled `submit`.
///
/// Returns `true` when the button was clicked.
fn create_form(
    ui: &mut Ui,
    submit: &str,
    error: Option<&str>,
    add_fields: impl FnOnce(&mut Ui),
) -> bool {
    Frame::group(ui.style())
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.strong(format!("{submit}:"));
            ui.add_space(6.0);
            add_fields(ui);
            form_error(ui, error);
            ui.add_space(6.0);
            ui.button(submit).clicked()
        })
        .inner
}

/// Validated body to a create mutation for `T`'s collection.
fn create_mutation<T: Record, B: Serialize>(
    handle: &billing_business::ResourceHandle<T>,
    body: Result<B, billing_business::ValidationError>,
) -> Result<Mutation, String> {
    let body = body.map_err(|err| err.to_string())?;
    Mutation::create(handle, &body).map_err(|err: RequestError| err.to_string())
}

/// `"{id} - {name}"`, the label of a record in a select.
fn option_label(id: i64, name: &str) -> String {
    format!("{id} - {name}")
}

//! Booklet lookup: pick a subscription and fetch its PDF.

use billing_business::actions::fetch_binary;
use billing_business::{
    BusinessConfig, Customer, RequestError, RequestOptions, Resource, ResourceClient,
    Subscription,
};
use billing_states::{Promise, PromiseStatus};
use egui::Ui;
use serde_json::Value;

use super::Page;
use super::option_label;
use crate::utils::file_saver::{FileSaver, SystemFileSaver, human_size};
use crate::widgets::{LoadStatus, load_status, select_field};

pub const TITLE: &str = "Consulta de Boletos";
pub const EMPTY_LABEL: &str = "Nenhum boleto disponível.";
pub const UNKNOWN_CUSTOMER: &str = "Cliente desconhecido";
pub const SAVE_LABEL: &str = "Salvar PDF";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Booklet {
    subscription_id: i64,
    bytes: Vec<u8>,
}

pub struct BillsPage {
    customers: ResourceClient<Customer>,
    subscriptions: ResourceClient<Subscription>,
    booklets: ResourceClient<Value>,
    selected: Option<i64>,
    request: Option<(i64, Promise<Result<Option<Vec<u8>>, RequestError>>)>,
    booklet: Option<Booklet>,
    saver: Box<dyn FileSaver>,
}

impl BillsPage {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            customers: ResourceClient::for_record(config, RequestOptions::default()),
            subscriptions: ResourceClient::for_record(config, RequestOptions::default()),
            booklets: ResourceClient::new(config, Resource::Booklets, RequestOptions::deferred()),
            selected: None,
            request: None,
            booklet: None,
            saver: Box::new(SystemFileSaver),
        }
    }

    /// `"{id} - {customer name}"` for each subscription.
    fn subscription_options(&self) -> Vec<(i64, String)> {
        let customers = self.customers.rows();
        self.subscriptions
            .rows()
            .iter()
            .map(|subscription| {
                let name = customers
                    .iter()
                    .find(|customer| customer.id == subscription.customer_id)
                    .map_or(UNKNOWN_CUSTOMER, |customer| customer.name.as_str());
                (subscription.id, option_label(subscription.id, name))
            })
            .collect()
    }

    fn fetch(&mut self, subscription_id: i64) {
        self.booklet = None;
        let promise = Promise::spawn(fetch_binary(self.booklets.handle(), subscription_id));
        self.request = Some((subscription_id, promise));
    }

    fn sync(&mut self) {
        self.customers.sync();
        self.subscriptions.sync();
        self.booklets.sync();

        let Some((subscription_id, promise)) = &self.request else {
            return;
        };
        let subscription_id = *subscription_id;
        let settled = match promise.poll() {
            PromiseStatus::Pending => return,
            PromiseStatus::Ready(Ok(Some(bytes))) => Some(Booklet {
                subscription_id,
                bytes,
            }),
            PromiseStatus::Ready(Ok(None)) => {
                log::warn!("booklet {subscription_id} is not a document");
                None
            }
            PromiseStatus::Ready(Err(err)) => {
                log::error!("Erro ao buscar boletos: {err}");
                None
            }
            PromiseStatus::Broken => None,
        };
        self.booklet = settled;
        self.request = None;
    }

    fn booklet_ui(&self, ui: &mut Ui) {
        if self.request.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Buscando boleto...");
            });
            return;
        }
        let Some(booklet) = &self.booklet else {
            ui.weak(EMPTY_LABEL);
            return;
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong("Boleto 1");
            ui.label(format!(
                "Assinatura {} · {}",
                booklet.subscription_id,
                human_size(booklet.bytes.len())
            ));
            if ui.button(SAVE_LABEL).clicked() {
                let name = format!("boleto-{}.pdf", booklet.subscription_id);
                if let Err(err) = self.saver.save(&name, &booklet.bytes) {
                    log::error!("could not save {name}: {err}");
                }
            }
        });
    }
}

impl Page for BillsPage {
    fn ui(&mut self, ui: &mut Ui) {
        self.sync();

        ui.heading(TITLE);
        let loading = self.customers.loading() || self.subscriptions.loading();
        let error = self
            .subscriptions
            .error()
            .or_else(|| self.customers.error())
            .or_else(|| self.booklets.error());
        if load_status(ui, LoadStatus::new(loading, error)) {
            self.customers.refresh();
            self.subscriptions.refresh();
        }
        ui.add_space(8.0);

        let options = self.subscription_options();
        let mut selected = self.selected;
        if select_field(ui, "Assinatura", &mut selected, &options) {
            self.selected = selected;
            match selected {
                Some(id) => self.fetch(id),
                None => {
                    self.request = None;
                    self.booklet = None;
                }
            }
        }

        ui.add_space(12.0);
        self.booklet_ui(ui);
    }

    fn is_busy(&self) -> bool {
        self.request.is_some() || self.customers.loading() || self.subscriptions.loading()
    }
}

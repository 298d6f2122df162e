//! Plans and additional services: a name and a required price.

use billing_business::models::PricedChanges;
use billing_business::validation::PricedItemForm;
use billing_business::{
    AdditionalService, BusinessConfig, ColumnDef, ColumnKind, Plan, Record, TableRow,
};
use egui::Ui;

use super::listing::Listing;
use super::pending::ActionKind;
use super::{Page, create_form, create_mutation};
use crate::widgets::text_field;

pub trait PricedRecord: Record + TableRow {
    const TITLE: &'static str;
    const CREATE_LABEL: &'static str;

    fn changes(&self) -> PricedChanges;
}

impl PricedRecord for Plan {
    const TITLE: &'static str = "Planos";
    const CREATE_LABEL: &'static str = "Criar Plano";

    fn changes(&self) -> PricedChanges {
        PricedChanges {
            name: self.name.clone(),
            price: Some(self.price),
        }
    }
}

impl PricedRecord for AdditionalService {
    const TITLE: &'static str = "Serviços Adicionais";
    const CREATE_LABEL: &'static str = "Criar Serviço Adicional";

    fn changes(&self) -> PricedChanges {
        PricedChanges {
            name: self.name.clone(),
            price: Some(self.price),
        }
    }
}

pub type PlansPage = PricedPage<Plan>;
pub type ServicesPage = PricedPage<AdditionalService>;

pub struct PricedPage<T: PricedRecord> {
    listing: Listing<T>,
    form: PricedItemForm,
    form_error: Option<String>,
}

impl<T: PricedRecord> PricedPage<T> {
    pub fn new(config: &BusinessConfig) -> Self {
        let columns = vec![
            ColumnDef::new("name", "Nome", ColumnKind::Text)
                .editable()
                .width(200.0),
            ColumnDef::new("price", "Preço", ColumnKind::Currency)
                .editable()
                .width(120.0),
            ColumnDef::new("created_at", "Criado em", ColumnKind::Timestamp).width(160.0),
            ColumnDef::new("updated_at", "Atualizado em", ColumnKind::Timestamp).width(160.0),
        ];
        Self {
            listing: Listing::editable(config, columns, T::changes),
            form: PricedItemForm::default(),
            form_error: None,
        }
    }

    fn submit(&mut self) {
        match create_mutation(&self.listing.client().handle(), self.form.validate()) {
            Ok(mutation) => {
                self.form_error = None;
                self.listing.submit(ActionKind::Create, mutation);
            }
            Err(message) => self.form_error = Some(message),
        }
    }
}

impl<T: PricedRecord> Page for PricedPage<T> {
    fn ui(&mut self, ui: &mut Ui) {
        for (kind, result) in self.listing.sync() {
            if kind == ActionKind::Create && result.is_ok() {
                self.form = PricedItemForm::default();
            }
        }

        ui.heading(T::TITLE);
        self.listing.status_ui(ui);
        ui.add_space(8.0);

        let form = &mut self.form;
        if create_form(ui, T::CREATE_LABEL, self.form_error.as_deref(), |ui| {
            text_field(ui, "Nome", &mut form.name);
            text_field(ui, "Preço", &mut form.price);
        }) {
            self.submit();
        }

        ui.add_space(8.0);
        self.listing.table_ui(ui);
    }

    fn is_busy(&self) -> bool {
        self.listing.is_busy()
    }
}

use billing_business::models::CustomerChanges;
use billing_business::validation::CustomerForm;
use billing_business::{BusinessConfig, ColumnDef, ColumnKind, Customer};
use egui::Ui;

use super::listing::Listing;
use super::pending::ActionKind;
use super::{Page, create_form, create_mutation};
use crate::widgets::text_field;

pub const TITLE: &str = "Clientes";
pub const CREATE_LABEL: &str = "Criar Cliente";

pub struct CustomersPage {
    listing: Listing<Customer>,
    form: CustomerForm,
    form_error: Option<String>,
}

impl CustomersPage {
    pub fn new(config: &BusinessConfig) -> Self {
        let columns = vec![
            ColumnDef::new("name", "Nome", ColumnKind::Text)
                .editable()
                .width(200.0),
            ColumnDef::new("age", "Idade", ColumnKind::Number)
                .editable()
                .width(90.0),
            ColumnDef::new("created_at", "Criado em", ColumnKind::Timestamp).width(160.0),
            ColumnDef::new("updated_at", "Atualizado em", ColumnKind::Timestamp).width(160.0),
        ];
        let listing = Listing::editable(config, columns, |row: &Customer| CustomerChanges {
            name: row.name.clone(),
            age: row.age,
        });
        Self {
            listing,
            form: CustomerForm::default(),
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

impl Page for CustomersPage {
    fn ui(&mut self, ui: &mut Ui) {
        for (kind, result) in self.listing.sync() {
            if kind == ActionKind::Create && result.is_ok() {
                self.form = CustomerForm::default();
            }
        }

        ui.heading(TITLE);
        self.listing.status_ui(ui);
        ui.add_space(8.0);

        let form = &mut self.form;
        if create_form(ui, CREATE_LABEL, self.form_error.as_deref(), |ui| {
            text_field(ui, "Nome", &mut form.name);
            text_field(ui, "Idade", &mut form.age);
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

use billing_business::models::PricedChanges;
use billing_business::validation::PackageForm;
use billing_business::{
    AdditionalService, BusinessConfig, ColumnDef, ColumnKind, Package, Plan, RequestOptions,
    ResourceClient,
};
use egui::Ui;

use super::listing::Listing;
use super::lookup::NameLookup;
use super::pending::ActionKind;
use super::{Page, create_form, create_mutation, option_label};
use crate::widgets::{multi_select_field, select_field, text_field};

pub const TITLE: &str = "Pacotes";
pub const CREATE_LABEL: &str = "Criar Pacote";

pub struct PackagesPage {
    listing: Listing<Package>,
    plans: ResourceClient<Plan>,
    services: ResourceClient<AdditionalService>,
    plan_names: NameLookup,
    form: PackageForm,
    form_error: Option<String>,
}

impl PackagesPage {
    pub fn new(config: &BusinessConfig) -> Self {
        let plan_names = NameLookup::default();
        let lookup = plan_names.clone();
        let columns = vec![
            ColumnDef::new("name", "Nome", ColumnKind::Text)
                .editable()
                .width(160.0),
            ColumnDef::new("plan_id", "Plano", ColumnKind::Custom)
                .width(140.0)
                .formatter(move |row: &Package| {
                    row.plan_id
                        .map(|id| lookup.name_or_id(id))
                        .unwrap_or_default()
                }),
            ColumnDef::new("adicional_services", "Serviços", ColumnKind::Text).width(200.0),
            ColumnDef::new("price", "Preço", ColumnKind::Currency)
                .editable()
                .width(120.0),
        ];
        let listing = Listing::editable(config, columns, |row: &Package| PricedChanges {
            name: row.name.clone(),
            price: row.price,
        });
        Self {
            listing,
            plans: ResourceClient::for_record(config, RequestOptions::default()),
            services: ResourceClient::for_record(config, RequestOptions::default()),
            plan_names,
            form: PackageForm::default(),
            form_error: None,
        }
    }

    fn sync(&mut self) {
        if self.plans.sync() {
            self.plan_names.replace(
                self.plans
                    .rows()
                    .iter()
                    .map(|plan| (plan.id, plan.name.as_str())),
            );
        }
        self.services.sync();
        for (kind, result) in self.listing.sync() {
            if kind == ActionKind::Create && result.is_ok() {
                self.form = PackageForm::default();
            }
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

impl Page for PackagesPage {
    fn ui(&mut self, ui: &mut Ui) {
        self.sync();

        ui.heading(TITLE);
        self.listing.status_ui(ui);
        ui.add_space(8.0);

        let plan_options: Vec<(i64, String)> = self
            .plans
            .rows()
            .iter()
            .map(|plan| (plan.id, option_label(plan.id, &plan.name)))
            .collect();
        let service_options: Vec<(i64, String)> = self
            .services
            .rows()
            .iter()
            .map(|service| (service.id, service.name.clone()))
            .collect();

        let form = &mut self.form;
        if create_form(ui, CREATE_LABEL, self.form_error.as_deref(), |ui| {
            text_field(ui, "Nome", &mut form.name);
            text_field(ui, "Preço", &mut form.price);
            select_field(ui, "Plano", &mut form.plan_id, &plan_options);
            if let Some(id) =
                multi_select_field(ui, "Serviços adicionais", &form.service_ids, &service_options)
            {
                form.toggle_service(id);
            }
        }) {
            self.submit();
        }

        ui.add_space(8.0);
        self.listing.table_ui(ui);
    }

    fn is_busy(&self) -> bool {
        self.listing.is_busy() || self.plans.loading() || self.services.loading()
    }
}

//! Subscriptions: a customer with exactly one of a plan or a package, plus extras.
//! Rows are read-only; they can only be created and deleted.

use billing_business::validation::SubscriptionForm;
use billing_business::{
    AdditionalService, BusinessConfig, ColumnDef, ColumnKind, Customer, Package, Plan,
    RequestOptions, ResourceClient, Subscription,
};
use egui::Ui;

use super::listing::Listing;
use super::lookup::NameLookup;
use super::pending::ActionKind;
use super::{Page, create_form, create_mutation, option_label};
use crate::widgets::{multi_select_field, select_field};

pub const TITLE: &str = "Assinaturas";
pub const CREATE_LABEL: &str = "Criar Assinatura";

pub struct SubscriptionsPage {
    listing: Listing<Subscription>,
    customers: ResourceClient<Customer>,
    plans: ResourceClient<Plan>,
    packages: ResourceClient<Package>,
    services: ResourceClient<AdditionalService>,
    customer_names: NameLookup,
    plan_names: NameLookup,
    package_names: NameLookup,
    form: SubscriptionForm,
    form_error: Option<String>,
}

impl SubscriptionsPage {
    pub fn new(config: &BusinessConfig) -> Self {
        let customer_names = NameLookup::default();
        let plan_names = NameLookup::default();
        let package_names = NameLookup::default();

        let customers = customer_names.clone();
        let plans = plan_names.clone();
        let packages = package_names.clone();
        let columns = vec![
            ColumnDef::new("customer_id", "Cliente", ColumnKind::Custom)
                .width(160.0)
                .formatter(move |row: &Subscription| customers.name_or_id(row.customer_id)),
            ColumnDef::new("plan_id", "Plano/Pacote", ColumnKind::Custom)
                .width(160.0)
                .formatter(move |row: &Subscription| {
                    row.plan_id
                        .and_then(|id| plans.get(id))
                        .or_else(|| row.package_id.and_then(|id| packages.get(id)))
                        .unwrap_or_default()
                }),
            ColumnDef::new("adicional_services", "Serviços Adicionais", ColumnKind::Text)
                .width(220.0),
            ColumnDef::new("created_at", "Criado em", ColumnKind::Timestamp).width(160.0),
        ];

        Self {
            listing: Listing::read_only(config, columns),
            customers: ResourceClient::for_record(config, RequestOptions::default()),
            plans: ResourceClient::for_record(config, RequestOptions::default()),
            packages: ResourceClient::for_record(config, RequestOptions::default()),
            services: ResourceClient::for_record(config, RequestOptions::default()),
            customer_names,
            plan_names,
            package_names,
            form: SubscriptionForm::default(),
            form_error: None,
        }
    }

    fn sync(&mut self) {
        if self.customers.sync() {
            self.customer_names
                .replace(self.customers.rows().iter().map(|c| (c.id, c.name.as_str())));
        }
        if self.plans.sync() {
            self.plan_names
                .replace(self.plans.rows().iter().map(|p| (p.id, p.name.as_str())));
        }
        if self.packages.sync() {
            self.package_names
                .replace(self.packages.rows().iter().map(|p| (p.id, p.name.as_str())));
        }
        self.services.sync();
        for (kind, result) in self.listing.sync() {
            if kind == ActionKind::Create && result.is_ok() {
                self.form = SubscriptionForm::default();
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

    fn form_ui(&mut self, ui: &mut Ui) {
        let customer_options: Vec<(i64, String)> = self
            .customers
            .rows()
            .iter()
            .map(|c| (c.id, option_label(c.id, &c.name)))
            .collect();
        let plan_options: Vec<(i64, String)> = self
            .plans
            .rows()
            .iter()
            .map(|p| (p.id, option_label(p.id, &p.name)))
            .collect();
        let package_options: Vec<(i64, String)> = self
            .packages
            .rows()
            .iter()
            .map(|p| (p.id, option_label(p.id, &p.name)))
            .collect();
        let service_options: Vec<(i64, String)> = self
            .form
            .available_services(self.services.rows(), self.packages.rows())
            .into_iter()
            .map(|s| (s.id, s.name.clone()))
            .collect();

        let packages = self.packages.rows();
        let form = &mut self.form;
        let submitted = create_form(ui, CREATE_LABEL, self.form_error.as_deref(), |ui| {
            select_field(ui, "Cliente", &mut form.customer_id, &customer_options);

            let mut plan_id = form.plan_id;
            if select_field(ui, "Plano", &mut plan_id, &plan_options) {
                form.select_plan(plan_id);
            }
            let mut package_id = form.package_id;
            if select_field(ui, "Pacote", &mut package_id, &package_options) {
                form.select_package(package_id, packages);
            }

            if let Some(id) =
                multi_select_field(ui, "Serviços adicionais", &form.service_ids, &service_options)
            {
                form.toggle_service(id);
            }
        });
        if submitted {
            self.submit();
        }
    }
}

impl Page for SubscriptionsPage {
    fn ui(&mut self, ui: &mut Ui) {
        self.sync();

        ui.heading(TITLE);
        self.listing.status_ui(ui);
        ui.add_space(8.0);
        self.form_ui(ui);
        ui.add_space(8.0);
        self.listing.table_ui(ui);
    }

    fn is_busy(&self) -> bool {
        self.listing.is_busy()
            || self.customers.loading()
            || self.plans.loading()
            || self.packages.loading()
            || self.services.loading()
    }
}

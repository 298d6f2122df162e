use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pages::{Page, page_for};
use crate::state::State;

pub const APP_TITLE: &str = "TV Subscription Management";

/// How often a busy page is redrawn so settled requests show up.
const BUSY_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Customers,
    Plans,
    Services,
    Packages,
    Subscriptions,
    Bills,
}

impl Route {
    pub const ALL: [Self; 6] = [
        Self::Customers,
        Self::Plans,
        Self::Services,
        Self::Packages,
        Self::Subscriptions,
        Self::Bills,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Customers => "Clientes",
            Self::Plans => "Planos",
            Self::Services => "Serviços Adicionais",
            Self::Packages => "Pacotes",
            Self::Subscriptions => "Assinaturas",
            Self::Bills => "Cobranças",
        }
    }
}

pub struct BillingApp {
    state: State,
    route: Route,
    page: Box<dyn Page>,
}

impl BillingApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, state: State) -> Self {
        let route = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_route(state, route)
    }

    pub fn with_route(state: State, route: Route) -> Self {
        let page = page_for(route, &state.config);
        Self { state, route, page }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Replaces the page; the old page's clients are dropped with it.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        log::info!("navigate {:?} -> {route:?}", self.route);
        self.route = route;
        self.page = page_for(route, &self.state.config);
    }

    fn nav_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.strong(APP_TITLE);
            ui.separator();
            let mut next = None;
            for route in Route::ALL {
                if ui.selectable_label(self.route == route, route.label()).clicked() {
                    next = Some(route);
                }
            }
            if let Some(route) = next {
                self.navigate(route);
            }
        });
    }
}

impl eframe::App for BillingApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                self.nav_bar(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.page.ui(ui);
                });
        });

        if self.page.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.route);
    }
}

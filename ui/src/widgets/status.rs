use crate::utils::colors::{COLOR_AMBER, COLOR_GREEN, COLOR_RED};
use egui::{Color32, Response, Ui};

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 5.0;

pub const RETRY_LABEL: &str = "Tentar novamente";
pub const LOADING_LABEL: &str = "Carregando...";

/// Where a page's data stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus<'a> {
    Loading,
    Failed(&'a str),
    Ready,
}

impl<'a> LoadStatus<'a> {
    pub fn new(loading: bool, error: Option<&'a str>) -> Self {
        match (loading, error) {
            (true, _) => Self::Loading,
            (false, Some(error)) => Self::Failed(error),
            (false, None) => Self::Ready,
        }
    }

    fn dot(self) -> (String, Color32) {
        match self {
            Self::Loading => (LOADING_LABEL.to_string(), COLOR_AMBER),
            Self::Failed(error) => (error.to_string(), COLOR_RED),
            Self::Ready => ("Atualizado".to_string(), COLOR_GREEN),
        }
    }
}

/// Renders a single status dot with tooltip using a drawn circle
fn status_dot(ui: &mut Ui, tooltip_text: String, dot_color: Color32) -> Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );

    ui.painter()
        .circle(rect.center(), STATUS_DOT_RADIUS, dot_color, egui::Stroke::NONE);

    response.on_hover_text(tooltip_text)
}

/// Status dot, spinner while loading, and the last error with a retry button.
///
/// Returns `true` when retry was clicked.
pub fn load_status(ui: &mut Ui, status: LoadStatus<'_>) -> bool {
    let (tooltip, color) = status.dot();
    ui.horizontal(|ui| {
        status_dot(ui, tooltip, color);
        match status {
            LoadStatus::Loading => {
                ui.spinner();
                ui.label(LOADING_LABEL);
                false
            }
            LoadStatus::Failed(error) => {
                ui.colored_label(COLOR_RED, error);
                ui.button(RETRY_LABEL).clicked()
            }
            LoadStatus::Ready => false,
        }
    })
    .inner
}

/// A one-line notice, such as a save whose refresh failed.
pub fn notice(ui: &mut Ui, text: &str) {
    ui.colored_label(COLOR_AMBER, text);
}

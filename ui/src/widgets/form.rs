//! Inputs for the create forms.

use egui::{ComboBox, Response, TextEdit, Ui};

use crate::utils::colors::COLOR_RED;

pub const NONE_SELECTED: &str = "Selecione...";

/// A labelled single-line text input.
pub fn text_field(ui: &mut Ui, label: &str, value: &mut String) -> Response {
    ui.horizontal(|ui| {
        let label = ui.label(label);
        ui.add(TextEdit::singleline(value).desired_width(220.0))
            .labelled_by(label.id)
    })
    .inner
}

/// A labelled drop-down over `(id, label)` options. Returns `true` when the selection changed.
pub fn select_field(
    ui: &mut Ui,
    label: &str,
    value: &mut Option<i64>,
    options: &[(i64, String)],
) -> bool {
    let before = *value;
    let selected_text = value
        .and_then(|id| options.iter().find(|(option, _)| *option == id))
        .map_or(NONE_SELECTED, |(_, text)| text.as_str())
        .to_string();

    ui.horizontal(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(label)
            .selected_text(selected_text)
            .width(220.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(value, None, NONE_SELECTED);
                for (id, text) in options {
                    ui.selectable_value(value, Some(*id), text);
                }
            });
    });
    *value != before
}

/// A labelled group of checkboxes. Returns the id that was toggled, if any.
pub fn multi_select_field(
    ui: &mut Ui,
    label: &str,
    selected: &[i64],
    options: &[(i64, String)],
) -> Option<i64> {
    let mut toggled = None;
    ui.horizontal_wrapped(|ui| {
        ui.label(label);
        if options.is_empty() {
            ui.weak("Nenhum disponível");
        }
        for (id, text) in options {
            let mut checked = selected.contains(id);
            if ui.checkbox(&mut checked, text).changed() {
                toggled = Some(*id);
            }
        }
    });
    toggled
}

/// The form's validation message, if any.
pub fn form_error(ui: &mut Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.colored_label(COLOR_RED, error);
    }
}

//! Cell rendering for the data table.

use egui::{Key, Response, RichText, Sense, TextEdit, Ui};

/// What happened in an open edit box this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    None,
    Commit,
    Cancel,
}

/// Row selection checkbox. Returns `true` when toggled.
#[inline]
pub fn render_select_cell(ui: &mut Ui, selected: bool) -> bool {
    let mut checked = selected;
    ui.add(egui::Checkbox::without_text(&mut checked)).changed()
}

/// A plain value. Editable values respond to clicks.
#[inline]
pub fn render_value_cell(ui: &mut Ui, text: &str, editable: bool) -> Response {
    if editable {
        ui.add(egui::Label::new(text).sense(Sense::click()))
            .on_hover_text("Clique para editar")
    } else {
        ui.label(text)
    }
}

/// A value whose edit is still being saved.
#[inline]
pub fn render_pending_cell(ui: &mut Ui, text: &str) {
    ui.spinner();
    ui.label(RichText::new(text).weak());
}

/// The open edit box. Enter or leaving the box commits, Escape cancels.
#[inline]
pub fn render_edit_cell(ui: &mut Ui, draft: &mut String) -> EditEvent {
    let response = ui.add(TextEdit::singleline(draft).desired_width(f32::INFINITY));
    if response.lost_focus() {
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            EditEvent::Cancel
        } else {
            EditEvent::Commit
        }
    } else {
        if !response.has_focus() {
            response.request_focus();
        }
        EditEvent::None
    }
}

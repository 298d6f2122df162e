//! Body rows of the data table.

use billing_business::{ColumnDef, EditableTable, TableRow as Record};
use egui::{Stroke, Ui};
use egui_extras::TableRow;
use ustr::Ustr;

use super::cells::{
    EditEvent, render_edit_cell, render_pending_cell, render_select_cell, render_value_cell,
};

/// Something the user did in a row, applied after the table is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    ToggleSelected(i64),
    TogglePage,
    BeginEdit { row_id: i64, key: Ustr },
    Commit,
    Cancel,
}

/// Renders one row: the selection checkbox, then a cell per column.
///
/// The open edit box writes straight into the table's draft; everything else is
/// returned as actions.
#[inline]
pub fn render_row<R: Record>(
    row: &mut TableRow<'_, '_>,
    data: &R,
    columns: &[ColumnDef<R>],
    table: &mut EditableTable<R>,
) -> Vec<RowAction> {
    let id = data.id();
    let mut actions = Vec::new();

    row.col(|ui| {
        if render_select_cell(ui, table.is_selected(id)) {
            actions.push(RowAction::ToggleSelected(id));
        }
        draw_cell_bottom_border(ui);
    });

    let pending = table.is_pending(id);
    for column in columns {
        row.col(|ui| {
            if table.is_editing(id, &column.key) {
                if let Some(draft) = table.draft_mut() {
                    match render_edit_cell(ui, draft) {
                        EditEvent::Commit => actions.push(RowAction::Commit),
                        EditEvent::Cancel => actions.push(RowAction::Cancel),
                        EditEvent::None => {}
                    }
                }
            } else if pending {
                render_pending_cell(ui, &column.display(data));
            } else {
                let editable = table.is_cell_editable(column);
                if render_value_cell(ui, &column.display(data), editable).clicked() {
                    actions.push(RowAction::BeginEdit {
                        row_id: id,
                        key: column.key,
                    });
                }
            }
            draw_cell_bottom_border(ui);
        });
    }

    actions
}

/// Draws a bottom border line for a cell.
#[inline]
fn draw_cell_bottom_border(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let border_color = ui.visuals().widgets.noninteractive.bg_stroke.color;
    ui.painter().hline(
        rect.left()..=rect.right(),
        rect.bottom(),
        Stroke::new(1.0, border_color),
    );
}

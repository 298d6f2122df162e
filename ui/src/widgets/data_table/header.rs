//! Header row of the data table.

use billing_business::{ColumnDef, EditableTable, TableRow as Record};
use egui::Ui;
use egui_extras::TableRow;

/// Selection state of the rows on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Some,
    All,
}

impl PageSelection {
    pub fn of<R: Record>(table: &EditableTable<R>, page_rows: &[R]) -> Self {
        let selected = page_rows
            .iter()
            .filter(|row| table.is_selected(row.id()))
            .count();
        match selected {
            0 => Self::None,
            n if n == page_rows.len() => Self::All,
            _ => Self::Some,
        }
    }
}

/// Renders the header. Returns `true` when the page checkbox was toggled.
#[inline]
pub fn render_table_header<R>(
    header: &mut TableRow<'_, '_>,
    columns: &[ColumnDef<R>],
    selection: PageSelection,
) -> bool {
    let mut toggled = false;
    header.col(|ui| {
        let mut checked = selection == PageSelection::All;
        let response = ui.add(
            egui::Checkbox::without_text(&mut checked)
                .indeterminate(selection == PageSelection::Some),
        );
        toggled = response.on_hover_text("Selecionar página").changed();
    });
    for column in columns {
        header.col(|ui| {
            render_header_cell(ui, &column.label);
        });
    }
    toggled
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}

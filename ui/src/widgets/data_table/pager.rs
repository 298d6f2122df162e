//! Page size selector and page navigation.

use billing_business::table::PAGE_SIZES;
use billing_business::{EditableTable, TableRow};
use egui::Ui;

pub const ROWS_PER_PAGE_LABEL: &str = "Linhas por página";
pub const PREVIOUS_LABEL: &str = "◀";
pub const NEXT_LABEL: &str = "▶";

pub fn render_pager<R: TableRow>(ui: &mut Ui, table: &mut EditableTable<R>) {
    ui.horizontal(|ui| {
        ui.label(ROWS_PER_PAGE_LABEL);
        let mut size = table.page_size();
        egui::ComboBox::from_id_salt(ui.id().with("page_size"))
            .selected_text(size.to_string())
            .width(48.0)
            .show_ui(ui, |ui| {
                for option in PAGE_SIZES {
                    ui.selectable_value(&mut size, option, option.to_string());
                }
            });
        if size != table.page_size() {
            table.set_page_size(size);
        }

        let (start, end, total) = table.page_range();
        ui.label(format!("{start}–{end} de {total}"));

        let page = table.page();
        if ui
            .add_enabled(page > 0, egui::Button::new(PREVIOUS_LABEL))
            .on_hover_text("Página anterior")
            .clicked()
        {
            table.previous_page();
        }
        if ui
            .add_enabled(page + 1 < table.page_count(), egui::Button::new(NEXT_LABEL))
            .on_hover_text("Próxima página")
            .clicked()
        {
            table.next_page();
        }
    });
}

//! Editable, paginated table over an [`EditableTable`].
//!
//! The widget only draws and collects what the user did; every state change goes
//! through the model after the table has been laid out:
//! - `columns`: Column widths
//! - `header`: Header row with the page selection checkbox
//! - `row`: Body rows
//! - `cells`: Cell rendering for each state a cell can be in
//! - `pager`: Page size and page navigation

mod cells;
pub mod columns;
pub mod header;
pub mod pager;
pub mod row;

use billing_business::table::EditOutcome;
use billing_business::{EditableTable, TableRow};
use egui::{Align, Color32, Frame, Layout, Margin, Stroke, Ui};
use egui_extras::TableBuilder;

use crate::utils::colors::COLOR_RED;
use columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use header::{PageSelection, render_table_header};
use row::{RowAction, render_row};

/// Label of the toolbar button that deletes the selected rows.
pub const DELETE_SELECTED_LABEL: &str = "Deletar Selecionados";

const TABLE_BORDER_COLOR: Color32 = Color32::from_rgb(200, 200, 200);

/// Draws `table` and applies what the user did this frame.
pub fn data_table<R: TableRow>(ui: &mut Ui, id_salt: &str, table: &mut EditableTable<R>) {
    render_toolbar(ui, table);

    let columns = table.columns().to_vec();
    let rows = table.page_rows().to_vec();
    let page_selection = PageSelection::of(table, &rows);
    let mut actions: Vec<RowAction> = Vec::new();

    Frame::NONE
        .stroke(Stroke::new(1.0, TABLE_BORDER_COLOR))
        .inner_margin(Margin::ZERO)
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .id_salt(id_salt)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center));
            for column in table_columns(&columns) {
                builder = builder.column(column);
            }

            builder
                .header(HEADER_HEIGHT, |mut header| {
                    if render_table_header(&mut header, &columns, page_selection) {
                        actions.push(RowAction::TogglePage);
                    }
                })
                .body(|mut body| {
                    for data in &rows {
                        body.row(ROW_HEIGHT, |mut row| {
                            actions.extend(render_row(&mut row, data, &columns, table));
                        });
                    }
                });
        });

    if rows.is_empty() {
        ui.add_space(8.0);
        ui.weak("Nenhum registro.");
    }

    apply_all(table, actions);

    ui.add_space(4.0);
    pager::render_pager(ui, table);
}

fn render_toolbar<R: TableRow>(ui: &mut Ui, table: &mut EditableTable<R>) {
    ui.horizontal(|ui| {
        let selected = table.selection().len();
        let clicked = ui
            .add_enabled(table.can_delete(), egui::Button::new(DELETE_SELECTED_LABEL))
            .clicked();
        if selected > 0 {
            ui.label(format!("{selected} selecionado(s)"));
        }
        if clicked {
            table.delete_selected();
        }
    });
    ui.add_space(4.0);
}

/// Closing the open cell goes first, so a click on another cell in the same frame
/// opens it instead of being committed away.
fn apply_all<R: TableRow>(table: &mut EditableTable<R>, actions: Vec<RowAction>) {
    let (closing, rest): (Vec<_>, Vec<_>) = actions
        .into_iter()
        .partition(|action| matches!(action, RowAction::Commit | RowAction::Cancel));
    for action in closing.into_iter().chain(rest) {
        apply(table, action);
    }
}

fn apply<R: TableRow>(table: &mut EditableTable<R>, action: RowAction) {
    match action {
        RowAction::ToggleSelected(id) => table.toggle_selected(id),
        RowAction::TogglePage => table.toggle_page_selection(),
        RowAction::BeginEdit { row_id, key } => {
            // Only one cell is open at a time; leaving a cell commits it.
            commit(table);
            if let Err(err) = table.begin_edit(row_id, &key) {
                log::debug!("row {row_id}: {err}");
            }
        }
        RowAction::Commit => commit(table),
        RowAction::Cancel => table.cancel_edit(),
    }
}

fn commit<R: TableRow>(table: &mut EditableTable<R>) {
    match table.commit_edit() {
        EditOutcome::Rejected(err) => log::warn!("edit rejected: {err}"),
        EditOutcome::Submitted | EditOutcome::Unchanged | EditOutcome::Idle => {}
    }
}

/// Shows `message` in red, if any.
pub fn render_error(ui: &mut Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(COLOR_RED, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestCtx, plan_rows};
    use billing_business::{ColumnDef, ColumnKind, Plan};
    use kittest::Queryable;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn plan_table() -> EditableTable<Plan> {
        let mut table = EditableTable::new(vec![
            ColumnDef::new("name", "Nome", ColumnKind::Text),
            ColumnDef::new("price", "Preço", ColumnKind::Currency),
        ]);
        table.set_rows(&plan_rows(12), 1);
        table
    }

    #[test]
    fn clicking_an_earlier_cell_keeps_it_open() {
        let mut table = EditableTable::new(vec![
            ColumnDef::<Plan>::new("name", "Nome", ColumnKind::Text).editable(),
        ])
        .on_row_edit(|row| billing_business::Promise::resolved(Ok(row)));
        table.set_rows(&plan_rows(12), 1);
        table.begin_edit(5, "name").expect("editable");

        // Row 2 is drawn before row 5, so its click is collected before row 5's commit.
        let actions = vec![
            RowAction::BeginEdit {
                row_id: 2,
                key: "name".into(),
            },
            RowAction::Commit,
        ];
        apply_all(&mut table, actions);

        assert!(table.is_editing(2, "name"));
        assert!(!table.is_editing(5, "name"));
    }

    #[tokio::test]
    async fn renders_headers_and_first_page() {
        let table = Rc::new(RefCell::new(plan_table()));
        let shared = table.clone();
        let mut ctx = TestCtx::new(move |ui, _state| {
            data_table(ui, "plans", &mut shared.borrow_mut());
        })
        .await;
        ctx.harness_mut().step();

        let harness = ctx.harness();
        assert!(harness.query_by_label("Nome").is_some());
        assert!(harness.query_by_label("Preço").is_some());
        assert!(harness.query_by_label("Plan 1").is_some());
        assert!(harness.query_by_label("Plan 10").is_some());
        assert!(harness.query_by_label("Plan 11").is_none());
        assert!(harness.query_by_label_contains("1–10 de 12").is_some());
    }

    #[tokio::test]
    async fn delete_button_is_disabled_without_selection() {
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let sink = deleted.clone();
        let table = Rc::new(RefCell::new(
            plan_table().on_delete(move |ids| sink.borrow_mut().push(ids)),
        ));
        let shared = table.clone();
        let mut ctx = TestCtx::new(move |ui, _state| {
            data_table(ui, "plans", &mut shared.borrow_mut());
        })
        .await;
        ctx.harness_mut().step();

        ctx.harness().get_by_label(DELETE_SELECTED_LABEL).click();
        ctx.harness_mut().step();
        assert!(deleted.borrow().is_empty());

        table.borrow_mut().set_selected(3, true);
        ctx.harness_mut().step();
        ctx.harness().get_by_label(DELETE_SELECTED_LABEL).click();
        ctx.harness_mut().step();
        ctx.harness_mut().step();
        assert_eq!(*deleted.borrow(), vec![vec![3]]);
    }

    #[tokio::test]
    async fn next_page_shows_remaining_rows() {
        let table = Rc::new(RefCell::new(plan_table()));
        let shared = table.clone();
        let mut ctx = TestCtx::new(move |ui, _state| {
            data_table(ui, "plans", &mut shared.borrow_mut());
        })
        .await;
        ctx.harness_mut().step();

        ctx.harness().get_by_label(pager::NEXT_LABEL).click();
        ctx.harness_mut().step();
        ctx.harness_mut().step();

        assert_eq!(table.borrow().page(), 1);
        assert!(ctx.harness().query_by_label("Plan 11").is_some());
        assert!(ctx.harness().query_by_label("Plan 1").is_none());
    }
}

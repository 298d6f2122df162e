//! Column widths for the data table.

use billing_business::ColumnDef;
use egui_extras::Column;

/// Width of the leading selection column.
pub const SELECT_WIDTH: f32 = 32.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// A fixed selection column, then one resizable column per definition.
/// The last column fills the remaining space.
#[inline]
pub fn table_columns<R>(columns: &[ColumnDef<R>]) -> Vec<Column> {
    let mut out = Vec::with_capacity(columns.len() + 1);
    out.push(Column::exact(SELECT_WIDTH));
    for (index, column) in columns.iter().enumerate() {
        if index + 1 == columns.len() {
            out.push(Column::remainder().at_least(column.width));
        } else {
            out.push(Column::initial(column.width).at_least(60.0).resizable(true));
        }
    }
    out
}

//! Editable table model.
//!
//! Holds column definitions, the current rows, the selection set, the cell being
//! edited and edits waiting on the persistence callback. Rendering lives in the UI
//! crate; everything observable about the table's behaviour lives here.
//!
//! - Selection is cleared whenever the row collection changes version.
//! - An edit is shown only once `on_row_edit` resolves with the saved row. A rejected
//!   edit leaves the original row in place.
//! - Without `on_row_edit` every cell is read-only. Timestamp columns are never editable.

use std::collections::BTreeSet;
use std::sync::Arc;

use billing_states::{Promise, PromiseStatus};
use chrono::{DateTime, Utc};
use ustr::Ustr;

use crate::format;

/// Page sizes offered by the pager.
pub const PAGE_SIZES: [usize; 2] = [5, 10];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How a column's values are parsed and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    /// Number rendered as BRL.
    Currency,
    /// Rendered in local time. Never editable.
    Timestamp,
    /// Display comes from the column formatter; edited as text.
    Custom,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Empty,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display without a column formatter.
    pub fn display(&self, kind: ColumnKind) -> String {
        match (self, kind) {
            (FieldValue::Empty, _) => String::new(),
            (FieldValue::Number(n), ColumnKind::Currency) => format::brl(*n),
            (FieldValue::Number(n), _) => number_text(*n),
            (FieldValue::Timestamp(at), _) => format::local_timestamp(at),
            (FieldValue::Text(s), _) => s.clone(),
        }
    }

    /// Initial text of an edit box.
    fn draft(&self, kind: ColumnKind) -> String {
        match (self, kind) {
            (FieldValue::Number(n), ColumnKind::Currency) => format!("{n:.2}").replace('.', ","),
            (FieldValue::Number(n), _) => number_text(*n),
            (FieldValue::Text(s), _) => s.clone(),
            (FieldValue::Timestamp(_) | FieldValue::Empty, _) => String::new(),
        }
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    Unknown(String),
    #[error("field `{0}` is read-only")]
    ReadOnly(String),
    #[error("invalid value {input:?} for `{key}`")]
    Invalid { key: String, input: String },
    #[error("row {0} is not in the table")]
    MissingRow(i64),
}

/// A row the table can display and edit.
pub trait TableRow: Clone + Send + 'static {
    fn id(&self) -> i64;

    fn field(&self, key: &str) -> FieldValue;

    /// Write an edited value back into the row.
    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError>;
}

pub type Formatter<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Describes one column.
pub struct ColumnDef<R> {
    pub key: Ustr,
    pub label: String,
    pub kind: ColumnKind,
    pub editable: bool,
    pub width: f32,
    formatter: Option<Formatter<R>>,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label.clone(),
            kind: self.kind,
            editable: self.editable,
            width: self.width,
            formatter: self.formatter.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("editable", &self.editable)
            .field("formatted", &self.formatter.is_some())
            .finish()
    }
}

impl<R: TableRow> ColumnDef<R> {
    pub fn new(key: &str, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: Ustr::from(key),
            label: label.into(),
            kind,
            editable: false,
            width: 120.0,
            formatter: None,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = kind_is_editable(self.kind);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn formatter(mut self, formatter: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn display(&self, row: &R) -> String {
        match &self.formatter {
            Some(formatter) => formatter(row),
            None => row.field(&self.key).display(self.kind),
        }
    }

    /// Parse an edit box into a value for this column.
    pub fn parse(&self, input: &str) -> Result<FieldValue, FieldError> {
        let invalid = || FieldError::Invalid {
            key: self.key.to_string(),
            input: input.to_string(),
        };
        match self.kind {
            ColumnKind::Text | ColumnKind::Custom => Ok(FieldValue::Text(input.trim().to_string())),
            ColumnKind::Number | ColumnKind::Currency if input.trim().is_empty() => {
                Ok(FieldValue::Empty)
            }
            ColumnKind::Number | ColumnKind::Currency => format::parse_decimal(input)
                .map(FieldValue::Number)
                .ok_or_else(invalid),
            ColumnKind::Timestamp => Err(FieldError::ReadOnly(self.key.to_string())),
        }
    }
}

fn kind_is_editable(kind: ColumnKind) -> bool {
    kind != ColumnKind::Timestamp
}

pub type RowEditFn<R> = Box<dyn FnMut(R) -> Promise<Result<R, String>>>;
pub type DeleteFn = Box<dyn FnMut(Vec<i64>)>;

/// The cell currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub row_id: i64,
    pub key: Ustr,
    pub draft: String,
}

/// Result of finishing a cell edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// `on_row_edit` was called; the row updates once it resolves.
    Submitted,
    /// The draft equals the current value.
    Unchanged,
    /// The draft did not parse or the row refused it. Nothing was sent.
    Rejected(FieldError),
    /// No cell was being edited.
    Idle,
}

/// How a submitted edit settled.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSettled {
    pub row_id: i64,
    pub result: Result<(), String>,
}

struct PendingEdit<R> {
    row_id: i64,
    promise: Promise<Result<R, String>>,
}

pub struct EditableTable<R: TableRow> {
    columns: Vec<ColumnDef<R>>,
    rows: Vec<R>,
    version: Option<u64>,
    selection: BTreeSet<i64>,
    editing: Option<CellEdit>,
    pending: Vec<PendingEdit<R>>,
    page: usize,
    page_size: usize,
    on_row_edit: Option<RowEditFn<R>>,
    on_delete: Option<DeleteFn>,
}

impl<R: TableRow> std::fmt::Debug for EditableTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableTable")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("version", &self.version)
            .field("selection", &self.selection)
            .field("editing", &self.editing)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<R: TableRow> EditableTable<R> {
    pub fn new(columns: Vec<ColumnDef<R>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            version: None,
            selection: BTreeSet::new(),
            editing: None,
            pending: Vec::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            on_row_edit: None,
            on_delete: None,
        }
    }

    pub fn on_row_edit(
        mut self,
        callback: impl FnMut(R) -> Promise<Result<R, String>> + 'static,
    ) -> Self {
        self.on_row_edit = Some(Box::new(callback));
        self
    }

    pub fn on_delete(mut self, callback: impl FnMut(Vec<i64>) + 'static) -> Self {
        self.on_delete = Some(Box::new(callback));
        self
    }

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: i64) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Replace rows when `version` differs from the one last shown.
    ///
    /// A new version clears the selection and drops an open edit on a row that no
    /// longer exists. Returns whether the rows were replaced.
    pub fn set_rows(&mut self, rows: &[R], version: u64) -> bool {
        if self.version == Some(version) {
            return false;
        }
        self.version = Some(version);
        self.rows = rows.to_vec();
        self.clear_selection();
        if let Some(edit) = &self.editing
            && self.row(edit.row_id).is_none()
        {
            self.editing = None;
        }
        self.page = self.page.min(self.page_count().saturating_sub(1));
        true
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn is_read_only(&self) -> bool {
        self.on_row_edit.is_none()
    }

    pub fn is_cell_editable(&self, column: &ColumnDef<R>) -> bool {
        !self.is_read_only() && column.editable && kind_is_editable(column.kind)
    }

    // Selection

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(&id)
    }

    /// Check or uncheck a row. Ids not present in the table are ignored.
    pub fn set_selected(&mut self, id: i64, selected: bool) {
        if selected {
            if self.row(id).is_some() {
                self.selection.insert(id);
            }
        } else {
            self.selection.remove(&id);
        }
    }

    pub fn toggle_selected(&mut self, id: i64) {
        let selected = self.is_selected(id);
        self.set_selected(id, !selected);
    }

    /// Check every row on the current page, or uncheck them if all are checked.
    pub fn toggle_page_selection(&mut self) {
        let ids: Vec<i64> = self.page_rows().iter().map(TableRow::id).collect();
        if ids.iter().all(|id| self.selection.contains(id)) {
            for id in &ids {
                self.selection.remove(id);
            }
        } else {
            self.selection.extend(ids);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Checked ids in ascending order.
    pub fn selection(&self) -> Vec<i64> {
        self.selection.iter().copied().collect()
    }

    pub fn can_delete(&self) -> bool {
        self.on_delete.is_some() && !self.selection.is_empty()
    }

    /// Hand the checked ids to `on_delete` and clear the selection.
    pub fn delete_selected(&mut self) -> bool {
        if !self.can_delete() {
            return false;
        }
        let ids = self.selection();
        self.clear_selection();
        if let Some(on_delete) = self.on_delete.as_mut() {
            log::info!("deleting rows {ids:?}");
            on_delete(ids);
        }
        true
    }

    // Inline edit

    pub fn editing(&self) -> Option<&CellEdit> {
        self.editing.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut String> {
        self.editing.as_mut().map(|edit| &mut edit.draft)
    }

    pub fn is_editing(&self, row_id: i64, key: &str) -> bool {
        self.editing
            .as_ref()
            .is_some_and(|edit| edit.row_id == row_id && edit.key == key)
    }

    pub fn is_pending(&self, row_id: i64) -> bool {
        self.pending.iter().any(|edit| edit.row_id == row_id)
    }

    /// Whether any submitted edit is still waiting on its callback.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Open a cell for editing, seeding the draft with its current value.
    pub fn begin_edit(&mut self, row_id: i64, key: &str) -> Result<(), FieldError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| FieldError::Unknown(key.to_string()))?;
        if !self.is_cell_editable(column) || self.is_pending(row_id) {
            return Err(FieldError::ReadOnly(key.to_string()));
        }
        let row = self.row(row_id).ok_or(FieldError::MissingRow(row_id))?;
        let draft = row.field(key).draft(column.kind);
        self.editing = Some(CellEdit {
            row_id,
            key: column.key,
            draft,
        });
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Finish the open edit and, if the value changed, submit the full updated row.
    pub fn commit_edit(&mut self) -> EditOutcome {
        let Some(edit) = self.editing.take() else {
            return EditOutcome::Idle;
        };
        let Some(column) = self.columns.iter().find(|c| c.key == edit.key) else {
            return EditOutcome::Rejected(FieldError::Unknown(edit.key.to_string()));
        };
        let Some(original) = self.row(edit.row_id) else {
            return EditOutcome::Rejected(FieldError::MissingRow(edit.row_id));
        };

        let value = match column.parse(&edit.draft) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("row {}: {err}", edit.row_id);
                return EditOutcome::Rejected(err);
            }
        };
        if original.field(&edit.key) == value {
            return EditOutcome::Unchanged;
        }

        let mut updated = original.clone();
        if let Err(err) = updated.set_field(&edit.key, value) {
            return EditOutcome::Rejected(err);
        }

        let Some(on_row_edit) = self.on_row_edit.as_mut() else {
            return EditOutcome::Rejected(FieldError::ReadOnly(edit.key.to_string()));
        };
        self.pending.push(PendingEdit {
            row_id: edit.row_id,
            promise: on_row_edit(updated),
        });
        EditOutcome::Submitted
    }

    /// Apply edits whose callback has settled. Call once per frame.
    pub fn poll_edits(&mut self) -> Vec<EditSettled> {
        let mut settled = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for edit in std::mem::take(&mut self.pending) {
            let result = match edit.promise.poll() {
                PromiseStatus::Pending => {
                    still_pending.push(edit);
                    continue;
                }
                PromiseStatus::Ready(Ok(saved)) => {
                    if let Some(row) = self.rows.iter_mut().find(|row| row.id() == edit.row_id) {
                        *row = saved;
                    }
                    Ok(())
                }
                PromiseStatus::Ready(Err(message)) => Err(message),
                PromiseStatus::Broken => Err("edit abandoned".to_string()),
            };
            if let Err(message) = &result {
                log::warn!("row {}: edit reverted: {message}", edit.row_id);
            }
            settled.push(EditSettled {
                row_id: edit.row_id,
                result,
            });
        }

        self.pending = still_pending;
        settled
    }

    // Pagination

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) {
        if PAGE_SIZES.contains(&size) {
            self.page_size = size;
            self.page = self.page.min(self.page_count().saturating_sub(1));
        }
    }

    /// At least one, even when empty.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn page_rows(&self) -> &[R] {
        let start = (self.page * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    /// `1–10 de 23` style range of the current page, 1-based.
    pub fn page_range(&self) -> (usize, usize, usize) {
        let total = self.rows.len();
        if total == 0 {
            return (0, 0, 0);
        }
        let start = self.page * self.page_size + 1;
        let end = (start + self.page_size - 1).min(total);
        (start, end, total)
    }
}

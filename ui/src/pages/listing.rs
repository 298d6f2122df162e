//! A resource collection shown in an editable table.

use billing_business::actions::{delete_all, mutate_then_refresh, save_row};
use billing_business::{
    BusinessConfig, ColumnDef, EditableTable, Mutation, Record, RequestOptions, ResourceClient,
    TableRow,
};
use billing_states::Promise;
use egui::Ui;
use serde::Serialize;

use super::pending::{ActionKind, ActionResult, PendingActions};
use crate::widgets::{LoadStatus, data_table, load_status, notice};

pub struct Listing<R: Record + TableRow> {
    client: ResourceClient<R>,
    table: EditableTable<R>,
    actions: PendingActions,
    notice: Option<&'static str>,
    /// Last failed action, kept even when a newer request superseded its settlement.
    failure: Option<String>,
}

impl<R: Record + TableRow> Listing<R> {
    /// Rows can be selected and deleted but not edited.
    pub fn read_only(config: &BusinessConfig, columns: Vec<ColumnDef<R>>) -> Self {
        Self::build(config, |_client, _actions| EditableTable::new(columns))
    }

    /// Edited rows are saved with `PUT`, sending the body `changes` builds from the row.
    pub fn editable<B, F>(config: &BusinessConfig, columns: Vec<ColumnDef<R>>, changes: F) -> Self
    where
        B: Serialize + Send + 'static,
        F: Fn(&R) -> B + 'static,
    {
        Self::build(config, move |client, actions| {
            let handle = client.handle();
            let edits = actions.clone();
            EditableTable::new(columns).on_row_edit(move |row: R| {
                let body = changes(&row);
                let save = save_row(handle.clone(), row, body);
                let (resolver, saved) = Promise::channel();
                edits.spawn(ActionKind::Edit, async move {
                    match save.await {
                        Ok((row, outcome)) => {
                            resolver.resolve(Ok(row));
                            Ok(outcome)
                        }
                        Err(err) => {
                            resolver.resolve(Err(err.to_string()));
                            Err(err)
                        }
                    }
                });
                saved
            })
        })
    }

    fn build(
        config: &BusinessConfig,
        table: impl FnOnce(&ResourceClient<R>, &PendingActions) -> EditableTable<R>,
    ) -> Self {
        let client = ResourceClient::for_record(config, RequestOptions::default());
        let actions = PendingActions::default();
        let handle = client.handle();
        let deletes = actions.clone();
        let table = table(&client, &actions).on_delete(move |ids| {
            deletes.spawn(ActionKind::Delete, delete_all(handle.clone(), ids));
        });
        Self {
            client,
            table,
            actions,
            notice: None,
            failure: None,
        }
    }

    pub fn client(&self) -> &ResourceClient<R> {
        &self.client
    }

    pub fn rows(&self) -> &[R] {
        self.client.rows()
    }

    /// Start a write, then refresh the collection once it succeeds.
    pub fn submit(&mut self, kind: ActionKind, mutation: Mutation) {
        self.notice = None;
        self.failure = None;
        self.actions
            .spawn(kind, mutate_then_refresh(self.client.handle(), mutation));
    }

    /// Apply whatever settled since the last frame and return finished actions.
    pub fn sync(&mut self) -> Vec<(ActionKind, ActionResult)> {
        self.client.sync();
        if self.table.set_rows(self.client.rows(), self.client.version()) {
            // A freshly loaded collection is neither stale nor affected by older failures.
            self.notice = None;
            self.failure = None;
        }
        self.table.poll_edits();

        let settled = self.actions.poll();
        for (kind, result) in &settled {
            match result {
                Ok(outcome) => {
                    self.notice = outcome.notice();
                    self.failure = None;
                }
                Err(err) if err.is_cancelled() => {
                    log::debug!("{}: {kind:?} cancelled", self.client.resource());
                }
                Err(err) => {
                    log::error!("{}: {kind:?} failed: {err}", self.client.resource());
                    self.failure = Some(err.to_string());
                }
            }
        }
        settled
    }

    pub fn is_busy(&self) -> bool {
        self.client.loading() || self.actions.is_busy() || self.table.has_pending()
    }

    pub fn status_ui(&mut self, ui: &mut Ui) {
        let error = self.client.error().or(self.failure.as_deref());
        let status = LoadStatus::new(self.client.loading(), error);
        if load_status(ui, status) {
            self.client.refresh();
        }
        if let Some(text) = self.notice {
            notice(ui, text);
        }
    }

    pub fn table_ui(&mut self, ui: &mut Ui) {
        let id_salt = self.client.resource().to_string();
        data_table(ui, &id_salt, &mut self.table);
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &EditableTable<R> {
        &self.table
    }

    #[cfg(test)]
    pub(crate) fn table_mut(&mut self) -> &mut EditableTable<R> {
        &mut self.table
    }
}

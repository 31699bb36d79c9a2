//! Command handlers - controller operations over `AppState`
//!
//! Every operation that needs the server returns the `ApiCommand` to send;
//! the list only changes when a `Listed` response for the latest load arrives.

use crate::app::form::DetailForm;
use crate::app::state::{AppState, Dialog};
use crate::messages::{ApiCommand, ApiResponse};
use crate::models::{Record, RecordFields};

impl AppState {
    // ========================
    // Loading
    // ========================

    /// Fetch the full list
    pub fn load(&mut self) -> ApiCommand {
        let id = self.next_id();
        self.is_loading = true;
        self.pending_load = Some(id);
        tracing::debug!(id, "Loading list");
        ApiCommand::List { id }
    }

    // ========================
    // List selection
    // ========================

    pub fn select_next(&mut self) {
        if !self.records.is_empty() {
            self.selected = (self.selected + 1).min(self.records.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.records.get(self.selected)
    }

    // ========================
    // Dialog
    // ========================

    pub fn open_create(&mut self) {
        self.dialog = Some(Dialog {
            editing: None,
            form: DetailForm::for_create(self.config.dialect),
            pending_save: None,
        });
    }

    pub fn open_edit(&mut self, record: Record) {
        let form = DetailForm::for_edit(self.config.dialect, &record);
        self.dialog = Some(Dialog {
            editing: Some(record),
            form,
            pending_save: None,
        });
    }

    /// Cancel: close the dialog and discard local edits
    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn form_mut(&mut self) -> Option<&mut DetailForm> {
        self.dialog.as_mut().map(|d| &mut d.form)
    }

    /// Validate the open form and, if it passes, save it
    pub fn submit_form(&mut self) -> Option<ApiCommand> {
        let fields = self.form_mut()?.submit()?;
        Some(self.save(fields))
    }

    /// Update when the dialog was opened on a persisted record, otherwise create
    pub fn save(&mut self, fields: RecordFields) -> ApiCommand {
        let id = self.next_id();
        let target = self
            .dialog
            .as_ref()
            .and_then(|d| d.editing.as_ref())
            .and_then(|r| r.id);
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.pending_save = Some(id);
        }

        match target {
            Some(record_id) => {
                tracing::debug!(id, record_id, "Updating record");
                ApiCommand::Update { id, record_id, fields }
            }
            None => {
                tracing::debug!(id, "Creating record");
                ApiCommand::Create { id, fields }
            }
        }
    }

    // ========================
    // Delete
    // ========================

    /// Delete intent from the list; asks first when confirmation is enabled
    pub fn request_delete(&mut self, record_id: i64) -> Option<ApiCommand> {
        if self.config.confirm_delete {
            self.pending_delete = Some(record_id);
            None
        } else {
            Some(self.delete(record_id))
        }
    }

    pub fn confirm_delete(&mut self) -> Option<ApiCommand> {
        let record_id = self.pending_delete.take()?;
        Some(self.delete(record_id))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn delete(&mut self, record_id: i64) -> ApiCommand {
        let id = self.next_id();
        tracing::debug!(id, record_id, "Deleting record");
        ApiCommand::Delete { id, record_id }
    }

    // ========================
    // Banners and popups
    // ========================

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.status = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; returns the follow-up reload after a mutation
    pub fn handle_response(&mut self, response: ApiResponse) -> Option<ApiCommand> {
        match response {
            ApiResponse::Listed { id, records } => {
                if self.pending_load != Some(id) {
                    tracing::debug!(id, "Ignoring stale list response");
                    return None;
                }
                self.records = records;
                self.selected = self.selected.min(self.records.len().saturating_sub(1));
                self.is_loading = false;
                self.has_loaded = true;
                self.pending_load = None;
                self.error = None;
                None
            }
            ApiResponse::Saved { id, .. } => {
                // A dialog opened after this save was sent stays open
                if self.dialog.as_ref().and_then(|d| d.pending_save) == Some(id) {
                    self.dialog = None;
                }
                self.status = Some(String::from("Saved"));
                Some(self.load())
            }
            ApiResponse::Deleted { record_id, .. } => {
                self.status = Some(format!("Deleted #{}", record_id));
                Some(self.load())
            }
            ApiResponse::Failed { id, message, .. } => {
                if self.pending_load == Some(id) {
                    self.is_loading = false;
                    self.pending_load = None;
                }
                if let Some(dialog) = self.dialog.as_mut().filter(|d| d.pending_save == Some(id)) {
                    dialog.pending_save = None;
                }
                self.status = None;
                self.error = Some(message);
                None
            }
        }
    }
}

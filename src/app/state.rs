//! App state - pure data structure with no I/O logic

use crate::app::form::DetailForm;
use crate::config::Config;
use crate::messages::ui_events::Screen;
use crate::messages::RenderState;
use crate::models::Record;

/// The open create/edit dialog
#[derive(Clone, Debug)]
pub struct Dialog {
    /// Record the dialog was opened on; `None` when creating
    pub editing: Option<Record>,
    pub form: DetailForm,
    /// Save issued from this dialog; only its reply closes the dialog
    pub pending_save: Option<u64>,
}

/// Main application state - the single source of truth for the record list
pub struct AppState {
    pub config: Config,

    // List
    pub records: Vec<Record>,
    pub selected: usize,
    pub is_loading: bool,
    pub has_loaded: bool,

    // Banners
    pub error: Option<String>,
    pub status: Option<String>,

    // Dialog and confirmation
    pub dialog: Option<Dialog>,
    pub pending_delete: Option<i64>,

    // Popups
    pub show_help: bool,

    // Request bookkeeping
    pub next_request_id: u64,
    /// Most recently issued list request; older list responses are ignored
    pub pending_load: Option<u64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            records: Vec::new(),
            selected: 0,
            is_loading: false,
            has_loaded: false,
            error: None,
            status: None,
            dialog: None,
            pending_delete: None,
            show_help: false,
            next_request_id: 1,
            pending_load: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn screen(&self) -> Screen {
        if self.dialog.is_some() {
            Screen::Dialog
        } else if self.pending_delete.is_some() {
            Screen::ConfirmDelete
        } else {
            Screen::List
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            dialect: self.config.dialect,
            base_url: self.config.base_url.clone(),
            screen: self.screen(),
            records: self.records.clone(),
            selected: self.selected,
            is_loading: self.is_loading,
            has_loaded: self.has_loaded,
            error: self.error.clone(),
            status: self.status.clone(),
            form: self.dialog.as_ref().map(|d| d.form.clone()),
            pending_delete: self.pending_delete,
            show_help: self.show_help,
        }
    }
}

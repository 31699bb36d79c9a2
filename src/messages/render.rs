//! Render state - data structure sent from App layer to UI for rendering

use crate::app::form::DetailForm;
use crate::messages::ui_events::Screen;
use crate::models::{ApiDialect, Record};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub dialect: ApiDialect,
    pub base_url: String,
    pub screen: Screen,

    // List
    pub records: Vec<Record>,
    pub selected: usize,
    pub is_loading: bool,
    /// False until the first list response arrives
    pub has_loaded: bool,

    // Banners
    pub error: Option<String>,
    pub status: Option<String>,

    // Dialog
    pub form: Option<DetailForm>,
    pub pending_delete: Option<i64>,

    // Popups
    pub show_help: bool,
}

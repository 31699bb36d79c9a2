//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{ApiCommand, ApiResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<ApiCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: Config,
        network_tx: mpsc::UnboundedSender<ApiCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<ApiResponse>,
    ) {
        // Fetch on start
        let initial = self.state.load();
        self.send(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(ApiCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(id = response.id(), "Response received");
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: ApiCommand) {
        let _ = self.network_tx.send(cmd);
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // List navigation
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::SelectFirst => self.state.select_first(),
            UiEvent::SelectLast => self.state.select_last(),

            // List actions
            UiEvent::OpenCreate => self.state.open_create(),
            UiEvent::Reload => {
                let cmd = self.state.load();
                self.send(cmd);
            }
            UiEvent::Edit(record) => self.state.open_edit(record),
            UiEvent::Delete(record_id) => {
                if let Some(cmd) = self.state.request_delete(record_id) {
                    self.send(cmd);
                }
            }

            // Delete confirmation
            UiEvent::ConfirmDelete => {
                if let Some(cmd) = self.state.confirm_delete() {
                    self.send(cmd);
                }
            }
            UiEvent::CancelDelete => self.state.cancel_delete(),

            // Dialog
            UiEvent::FormNextField => {
                if let Some(form) = self.state.form_mut() {
                    form.next_field();
                }
            }
            UiEvent::FormPrevField => {
                if let Some(form) = self.state.form_mut() {
                    form.prev_field();
                }
            }
            UiEvent::FormChar(c) => {
                if let Some(form) = self.state.form_mut() {
                    form.input_char(c);
                }
            }
            UiEvent::FormBackspace => {
                if let Some(form) = self.state.form_mut() {
                    form.backspace();
                }
            }
            UiEvent::FormActivate => {
                if let Some(form) = self.state.form_mut() {
                    form.activate();
                }
            }
            UiEvent::FormSubmit => {
                if let Some(cmd) = self.state.submit_form() {
                    self.send(cmd);
                }
            }
            UiEvent::FormCancel => self.state.close_dialog(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::DismissError => self.state.dismiss_error(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

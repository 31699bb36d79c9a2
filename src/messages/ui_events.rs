//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::form::FieldKind;
use crate::models::Record;

/// Which surface currently receives keys
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    List,
    Dialog,
    ConfirmDelete,
}

/// Row action on the selected record, resolved by the list view
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RowAction {
    Edit,
    Delete,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // List navigation
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,

    // List actions
    OpenCreate,
    Reload,
    Edit(Record),
    Delete(i64),

    // Delete confirmation
    ConfirmDelete,
    CancelDelete,

    // Dialog
    FormNextField,
    FormPrevField,
    FormChar(char),
    FormBackspace,
    FormActivate,
    FormSubmit,
    FormCancel,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissError,

    // System
    Quit,
}

/// What a key press means before it reaches the App layer.
///
/// Row actions need the rows on screen, so the UI loop resolves them
/// through the list view into `UiEvent::Edit`/`UiEvent::Delete`.
#[derive(Debug, Clone)]
pub enum KeyInput {
    Event(UiEvent),
    Row(RowAction),
}

/// Convert a key event to a KeyInput based on current UI context
pub fn key_to_input(
    key: KeyEvent,
    screen: Screen,
    focused_kind: Option<FieldKind>,
    show_help: bool,
) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(KeyInput::Event(UiEvent::Quit)),
            KeyCode::Char('s') if screen == Screen::Dialog => {
                return Some(KeyInput::Event(UiEvent::FormSubmit))
            }
            _ => {}
        }
    }

    if show_help {
        return Some(KeyInput::Event(UiEvent::CloseHelp));
    }

    match screen {
        Screen::List => handle_list_keys(key),
        Screen::ConfirmDelete => handle_confirm_keys(key).map(KeyInput::Event),
        Screen::Dialog => {
            handle_dialog_keys(key, focused_kind.unwrap_or(FieldKind::Text)).map(KeyInput::Event)
        }
    }
}

fn handle_list_keys(key: KeyEvent) -> Option<KeyInput> {
    let event = match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Home | KeyCode::Char('g') => Some(UiEvent::SelectFirst),
        KeyCode::End | KeyCode::Char('G') => Some(UiEvent::SelectLast),
        KeyCode::Char('a') | KeyCode::Char('n') => Some(UiEvent::OpenCreate),
        KeyCode::Char('e') | KeyCode::Enter => return Some(KeyInput::Row(RowAction::Edit)),
        KeyCode::Char('d') | KeyCode::Delete => return Some(KeyInput::Row(RowAction::Delete)),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        KeyCode::Char('x') | KeyCode::Esc => Some(UiEvent::DismissError),
        _ => None,
    };
    event.map(KeyInput::Event)
}

fn handle_confirm_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(UiEvent::ConfirmDelete),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::CancelDelete),
        _ => None,
    }
}

fn handle_dialog_keys(key: KeyEvent, kind: FieldKind) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::FormCancel),
        KeyCode::Enter => Some(UiEvent::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::FormPrevField),
        KeyCode::Backspace if kind == FieldKind::Text => Some(UiEvent::FormBackspace),
        KeyCode::Left | KeyCode::Right if kind == FieldKind::Radio => Some(UiEvent::FormActivate),
        KeyCode::Char(' ') if kind != FieldKind::Text => Some(UiEvent::FormActivate),
        KeyCode::Char(c) if kind == FieldKind::Text => Some(UiEvent::FormChar(c)),
        _ => None,
    }
}

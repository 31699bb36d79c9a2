//! Widgets: the record list view and the detail form body

use ratatui::{prelude::*, widgets::*};

use crate::app::form::{DetailForm, FieldKind};
use crate::messages::ui_events::RowAction;
use crate::messages::UiEvent;
use crate::models::{ApiDialect, Record, Visibility};

/// Intent emitted by the list view
#[derive(Clone, Debug, PartialEq)]
pub enum ListIntent {
    Edit(Record),
    Delete(i64),
}

impl From<ListIntent> for UiEvent {
    fn from(intent: ListIntent) -> Self {
        match intent {
            ListIntent::Edit(record) => UiEvent::Edit(record),
            ListIntent::Delete(id) => UiEvent::Delete(id),
        }
    }
}

/// Stateless table of records
pub struct ListView<'a> {
    records: &'a [Record],
    selected: usize,
    dialect: ApiDialect,
}

impl<'a> ListView<'a> {
    pub fn new(records: &'a [Record], selected: usize, dialect: ApiDialect) -> Self {
        ListView {
            records,
            selected,
            dialect,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> [&'static str; 4] {
        match self.dialect {
            ApiDialect::Items => ["Title", "Content", "Visibility", "Country"],
            ApiDialect::Todos => ["Title", "Content", "Completed", "Visibility"],
        }
    }

    /// One row of cell text per record, in list order
    pub fn rows(&self) -> Vec<[String; 4]> {
        self.records
            .iter()
            .map(|r| {
                let f = &r.fields;
                match self.dialect {
                    ApiDialect::Items => [
                        f.title.clone(),
                        f.content.clone(),
                        f.visibility.label().to_string(),
                        f.names.country_jp.clone(),
                    ],
                    ApiDialect::Todos => [
                        f.title.clone(),
                        f.content.clone(),
                        String::from(if f.completed { "Yes" } else { "No" }),
                        f.visibility.label().to_string(),
                    ],
                }
            })
            .collect()
    }

    /// Resolve a row action against the selected record.
    ///
    /// Unsaved records (no identifier) cannot be deleted.
    pub fn intent(&self, action: RowAction) -> Option<ListIntent> {
        let record = self.records.get(self.selected)?;
        match action {
            RowAction::Edit => Some(ListIntent::Edit(record.clone())),
            RowAction::Delete => record.id.map(ListIntent::Delete),
        }
    }

    pub fn table(&self, title: String, is_loading: bool) -> Table<'static> {
        let header = Row::new(self.headers().iter().map(|h| Cell::from(*h)))
            .style(Style::default().fg(Color::DarkGray).bold());

        let rows = self.rows().into_iter().map(|cells| Row::new(cells.map(Cell::from)));

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ];

        let loading = if is_loading { " [...]" } else { "" };

        Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(format!(" {}{} ", title, loading)),
            )
            .row_highlight_style(Style::default().fg(Color::Yellow).bold())
            .highlight_symbol("> ")
    }

    pub fn table_state(&self) -> TableState {
        let mut state = TableState::default();
        if !self.records.is_empty() {
            state.select(Some(self.selected.min(self.records.len() - 1)));
        }
        state
    }
}

/// Lines of the dialog body, focused field highlighted, errors under their field
pub fn form_lines(form: &DetailForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let focused = form.focused();

    for field in form.layout() {
        let is_focused = *field == focused;
        let label_style = if is_focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_focused { "> " } else { "  " };

        let value = match field.kind() {
            FieldKind::Text => {
                let text = form.text(*field).unwrap_or_default().to_string();
                if is_focused {
                    format!("{}_", text)
                } else {
                    text
                }
            }
            FieldKind::Checkbox => {
                let checked = form.is_checked(*field).unwrap_or(false);
                String::from(if checked { "[x]" } else { "[ ]" })
            }
            FieldKind::Radio => radio(form.visibility()),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<16}", marker, field.label()), label_style),
            Span::raw(value),
        ]));

        if let Some(error) = form.error(*field) {
            lines.push(Line::from(Span::styled(
                format!("  {:<16}{}", "", error),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines
}

fn radio(visibility: Visibility) -> String {
    let dot = |v: Visibility| if v == visibility { "(*)" } else { "( )" };
    format!(
        "{} {}  {} {}",
        dot(Visibility::Public),
        Visibility::Public.label(),
        dot(Visibility::Private),
        Visibility::Private.label()
    )
}

/// Title of the dialog for the given form
pub fn form_title(form: &DetailForm, dialect: ApiDialect) -> String {
    let verb = if form.is_edit() { "Edit" } else { "New" };
    format!(" {} {} (Enter save, Esc cancel) ", verb, dialect.noun())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<i64>, title: &str) -> Record {
        let mut record = Record {
            id,
            ..Default::default()
        };
        record.fields.title = title.to_string();
        record
    }

    #[test]
    fn test_one_row_per_record_in_order() {
        let records = vec![record(Some(2), "B"), record(Some(1), "A")];
        let view = ListView::new(&records, 0, ApiDialect::Items);
        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "B");
        assert_eq!(rows[1][0], "A");
        assert_eq!(rows[0][2], "Public");
    }

    #[test]
    fn test_todo_rows_show_completed() {
        let mut done = record(Some(1), "Done");
        done.fields.completed = true;
        let records = vec![done];
        let view = ListView::new(&records, 0, ApiDialect::Todos);
        assert_eq!(view.headers()[2], "Completed");
        assert_eq!(view.rows()[0][2], "Yes");
    }

    #[test]
    fn test_intents_follow_selection() {
        let records = vec![record(Some(1), "A"), record(Some(7), "B")];
        let view = ListView::new(&records, 1, ApiDialect::Items);
        assert_eq!(view.intent(RowAction::Delete), Some(ListIntent::Delete(7)));
        assert_eq!(view.intent(RowAction::Edit), Some(ListIntent::Edit(records[1].clone())));
    }

    #[test]
    fn test_no_intents_without_rows_or_id() {
        let empty: Vec<Record> = Vec::new();
        let view = ListView::new(&empty, 0, ApiDialect::Items);
        assert!(view.is_empty());
        assert!(view.intent(RowAction::Edit).is_none());
        assert!(view.table_state().selected().is_none());

        let unsaved = vec![record(None, "draft")];
        let view = ListView::new(&unsaved, 0, ApiDialect::Items);
        assert!(view.intent(RowAction::Delete).is_none());
    }

    #[test]
    fn test_form_lines_show_errors() {
        let mut form = DetailForm::for_create(ApiDialect::Items);
        assert!(form.submit().is_none());
        let lines = form_lines(&form);
        // one line per field plus the title error
        assert_eq!(lines.len(), form.layout().len() + 1);
        assert_eq!(radio(Visibility::Private), "( ) Public  (*) Private");
    }
}

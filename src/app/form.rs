//! Detail form - transient editable copy of one record
//!
//! Seeded once when the dialog opens and dropped when it closes. The form
//! never decides between create and update; it only yields the edited
//! `RecordFields` when validation passes.

use std::collections::HashMap;

use crate::models::{
    format_date, parse_date, ApiDialect, Category, Food, Record, RecordFields, Visibility, SLOT_COUNT,
};

/// Every bindable input of the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Content,
    ContentType,
    Completed,
    Visibility,
    Food(Food),
    Category(Category),
    CountryJp,
    CountryEn,
    PrefectureJp,
    PrefectureEn,
    SlotDate(usize),
    SlotQty(usize),
}

/// How a field is edited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    Radio,
}

impl FormField {
    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::Completed | FormField::Food(_) | FormField::Category(_) => FieldKind::Checkbox,
            FormField::Visibility => FieldKind::Radio,
            _ => FieldKind::Text,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FormField::Title => String::from("Title *"),
            FormField::Content => String::from("Content"),
            FormField::ContentType => String::from("Content type"),
            FormField::Completed => String::from("Completed"),
            FormField::Visibility => String::from("Visibility"),
            FormField::Food(food) => food.label().to_string(),
            FormField::Category(category) => category.label().to_string(),
            FormField::CountryJp => String::from("Country (JP)"),
            FormField::CountryEn => String::from("Country (EN)"),
            FormField::PrefectureJp => String::from("Prefecture (JP)"),
            FormField::PrefectureEn => String::from("Prefecture (EN)"),
            FormField::SlotDate(i) => format!("Date {}", i + 1),
            FormField::SlotQty(i) => format!("Qty {}", i + 1),
        }
    }

    /// Visible fields, in focus order, for a dialect
    pub fn layout(dialect: ApiDialect) -> Vec<FormField> {
        let mut fields = vec![FormField::Title, FormField::Content, FormField::ContentType];

        match dialect {
            ApiDialect::Items => {
                fields.push(FormField::Visibility);
                fields.extend(Food::ALL.iter().map(|f| FormField::Food(*f)));
                fields.extend(Category::ALL.iter().map(|c| FormField::Category(*c)));
                fields.extend([
                    FormField::CountryJp,
                    FormField::CountryEn,
                    FormField::PrefectureJp,
                    FormField::PrefectureEn,
                ]);
            }
            ApiDialect::Todos => {
                fields.push(FormField::Completed);
                fields.push(FormField::Visibility);
                fields.extend(Food::ALL.iter().map(|f| FormField::Food(*f)));
                for i in 0..SLOT_COUNT {
                    fields.push(FormField::SlotDate(i));
                    fields.push(FormField::SlotQty(i));
                }
            }
        }

        fields
    }
}

#[derive(Clone, Debug)]
pub struct DetailForm {
    /// Identifier of the record being edited, `None` for create
    original_id: Option<i64>,
    fields: RecordFields,
    /// Dates as typed; parsed on submit
    date_inputs: [String; SLOT_COUNT],
    errors: HashMap<FormField, String>,
    layout: Vec<FormField>,
    focus: usize,
}

impl DetailForm {
    /// Form seeded with defaults
    pub fn for_create(dialect: ApiDialect) -> Self {
        DetailForm {
            original_id: None,
            fields: RecordFields::default(),
            date_inputs: Default::default(),
            errors: HashMap::new(),
            layout: FormField::layout(dialect),
            focus: 0,
        }
    }

    /// Form seeded with an existing record's values
    pub fn for_edit(dialect: ApiDialect, record: &Record) -> Self {
        let fields = record.fields.clone();
        let date_inputs = std::array::from_fn(|i| fields.schedule[i].date.map(format_date).unwrap_or_default());

        DetailForm {
            original_id: record.id,
            fields,
            date_inputs,
            errors: HashMap::new(),
            layout: FormField::layout(dialect),
            focus: 0,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original_id.is_some()
    }

    /// Current, possibly unvalidated, values
    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    pub fn layout(&self) -> &[FormField] {
        &self.layout
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> FormField {
        self.layout.get(self.focus).copied().unwrap_or(FormField::Title)
    }

    pub fn next_field(&mut self) {
        if !self.layout.is_empty() {
            self.focus = (self.focus + 1) % self.layout.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.layout.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.layout.len() - 1);
        }
    }

    pub fn focus_field(&mut self, field: FormField) {
        if let Some(index) = self.layout.iter().position(|f| *f == field) {
            self.focus = index;
        }
    }

    // ========================
    // Binding
    // ========================

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.fields.title),
            FormField::Content => Some(&mut self.fields.content),
            FormField::ContentType => Some(&mut self.fields.content_type),
            FormField::CountryJp => Some(&mut self.fields.names.country_jp),
            FormField::CountryEn => Some(&mut self.fields.names.country_en),
            FormField::PrefectureJp => Some(&mut self.fields.names.prefecture_jp),
            FormField::PrefectureEn => Some(&mut self.fields.names.prefecture_en),
            FormField::SlotDate(i) => self.date_inputs.get_mut(i),
            FormField::SlotQty(i) => self.fields.schedule.get_mut(i).map(|s| &mut s.qty),
            _ => None,
        }
    }

    /// Text content of a text field
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Title => Some(&self.fields.title),
            FormField::Content => Some(&self.fields.content),
            FormField::ContentType => Some(&self.fields.content_type),
            FormField::CountryJp => Some(&self.fields.names.country_jp),
            FormField::CountryEn => Some(&self.fields.names.country_en),
            FormField::PrefectureJp => Some(&self.fields.names.prefecture_jp),
            FormField::PrefectureEn => Some(&self.fields.names.prefecture_en),
            FormField::SlotDate(i) => self.date_inputs.get(i).map(String::as_str),
            FormField::SlotQty(i) => self.fields.schedule.get(i).map(|s| s.qty.as_str()),
            _ => None,
        }
    }

    /// State of a checkbox field
    pub fn is_checked(&self, field: FormField) -> Option<bool> {
        match field {
            FormField::Completed => Some(self.fields.completed),
            FormField::Food(food) => Some(self.fields.foods.get(food)),
            FormField::Category(category) => Some(self.fields.categories.get(category)),
            _ => None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.fields.visibility
    }

    pub fn set_text(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(text) = self.text_mut(field) {
            *text = value.into();
            self.errors.remove(&field);
        }
    }

    pub fn toggle(&mut self, field: FormField) {
        match field {
            FormField::Completed => self.fields.completed = !self.fields.completed,
            FormField::Food(food) => self.fields.foods.toggle(food),
            FormField::Category(category) => self.fields.categories.toggle(category),
            _ => return,
        }
        self.errors.remove(&field);
    }

    pub fn select_visibility(&mut self, visibility: Visibility) {
        self.fields.visibility = visibility;
        self.errors.remove(&FormField::Visibility);
    }

    /// Type a character into the focused text field
    pub fn input_char(&mut self, c: char) {
        let field = self.focused();
        if let Some(text) = self.text_mut(field) {
            text.push(c);
            self.errors.remove(&field);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if let Some(text) = self.text_mut(field) {
            text.pop();
            self.errors.remove(&field);
        }
    }

    /// Space on the focused field: toggle a checkbox or flip the radio group
    pub fn activate(&mut self) {
        let field = self.focused();
        match field.kind() {
            FieldKind::Checkbox => self.toggle(field),
            FieldKind::Radio => {
                let next = match self.fields.visibility {
                    Visibility::Public => Visibility::Private,
                    Visibility::Private => Visibility::Public,
                };
                self.select_visibility(next);
            }
            FieldKind::Text => self.input_char(' '),
        }
    }

    // ========================
    // Validation
    // ========================

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<FormField, String> {
        &self.errors
    }

    fn validate(&mut self) -> bool {
        self.errors.clear();

        if self.fields.title.trim().is_empty() {
            self.errors.insert(FormField::Title, String::from("Title is required"));
        }

        for (i, input) in self.date_inputs.iter().enumerate() {
            if input.trim().is_empty() {
                self.fields.schedule[i].date = None;
                continue;
            }
            match parse_date(input) {
                Some(date) => self.fields.schedule[i].date = Some(date),
                None => {
                    self.errors.insert(
                        FormField::SlotDate(i),
                        String::from("Invalid date, use YYYY-MM-DD"),
                    );
                }
            }
        }

        if let Some(first) = self.layout.iter().position(|f| self.errors.contains_key(f)) {
            self.focus = first;
        }

        self.errors.is_empty()
    }

    /// Validate and hand out the edited fields.
    ///
    /// On failure the error map is populated and `None` is returned.
    pub fn submit(&mut self) -> Option<RecordFields> {
        if self.validate() {
            Some(self.fields.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> Record {
        let mut record = Record {
            id: Some(42),
            created_at: Some("2024-01-01".into()),
            ..Default::default()
        };
        record.fields.title = "Groceries".into();
        record.fields.content = "weekly".into();
        record.fields.visibility = Visibility::Private;
        record.fields.foods.apple = true;
        record.fields.categories.internet = true;
        record.fields.names.country_en = "Japan".into();
        record.fields.schedule[1].date = NaiveDate::from_ymd_opt(2024, 3, 15);
        record.fields.schedule[1].qty = "4".into();
        record
    }

    #[test]
    fn test_create_seeds_defaults() {
        let form = DetailForm::for_create(ApiDialect::Items);
        assert!(!form.is_edit());
        assert_eq!(form.fields(), &RecordFields::default());
        assert_eq!(form.visibility(), Visibility::Public);
        assert_eq!(form.focused(), FormField::Title);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_edit_seeds_record_values_without_identifier() {
        let record = sample_record();
        let mut form = DetailForm::for_edit(ApiDialect::Todos, &record);
        assert!(form.is_edit());
        assert_eq!(form.text(FormField::SlotDate(1)), Some("2024-03-15"));

        let submitted = form.submit().unwrap();
        assert_eq!(submitted, record.fields);
    }

    #[test]
    fn test_blank_title_blocks_submit() {
        let mut form = DetailForm::for_create(ApiDialect::Items);
        form.set_text(FormField::Title, "   ");
        assert!(form.submit().is_none());
        assert_eq!(form.error(FormField::Title), Some("Title is required"));

        form.input_char('x');
        assert!(form.error(FormField::Title).is_none());
        assert_eq!(form.submit().unwrap().title, "   x");
    }

    #[test]
    fn test_checkboxes_are_independent() {
        let mut form = DetailForm::for_create(ApiDialect::Items);
        form.toggle(FormField::Food(Food::Melon));
        form.toggle(FormField::Category(Category::Gadget));
        form.toggle(FormField::Category(Category::Gadget));

        assert_eq!(form.is_checked(FormField::Food(Food::Melon)), Some(true));
        assert_eq!(form.is_checked(FormField::Food(Food::Grape)), Some(false));
        assert_eq!(form.is_checked(FormField::Category(Category::Gadget)), Some(false));
        assert_eq!(form.is_checked(FormField::Title), None);
    }

    #[test]
    fn test_activate_flips_radio_and_checkbox() {
        let mut form = DetailForm::for_create(ApiDialect::Todos);
        form.focus_field(FormField::Visibility);
        form.activate();
        assert_eq!(form.visibility(), Visibility::Private);
        form.activate();
        assert_eq!(form.visibility(), Visibility::Public);

        form.focus_field(FormField::Completed);
        form.activate();
        assert!(form.fields().completed);
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = DetailForm::for_create(ApiDialect::Items);
        for c in "Hi".chars() {
            form.input_char(c);
        }
        form.next_field();
        form.input_char('z');
        form.backspace();
        form.input_char('y');
        assert_eq!(form.fields().title, "Hi");
        assert_eq!(form.fields().content, "y");
    }

    #[test]
    fn test_invalid_date_blocks_submit_and_takes_focus() {
        let mut form = DetailForm::for_create(ApiDialect::Todos);
        form.set_text(FormField::Title, "Order");
        form.set_text(FormField::SlotDate(2), "2024-13-40");
        form.set_text(FormField::SlotDate(0), "2024-06-01");

        assert!(form.submit().is_none());
        assert!(form.error(FormField::SlotDate(2)).is_some());
        assert_eq!(form.focused(), FormField::SlotDate(2));

        form.set_text(FormField::SlotDate(2), "");
        let fields = form.submit().unwrap();
        assert_eq!(fields.schedule[0].date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(fields.schedule[2].date, None);
    }

    #[test]
    fn test_layout_follows_dialect() {
        let items = FormField::layout(ApiDialect::Items);
        assert!(items.contains(&FormField::Category(Category::Smartphone)));
        assert!(!items.contains(&FormField::SlotDate(0)));

        let todos = FormField::layout(ApiDialect::Todos);
        assert!(todos.contains(&FormField::SlotQty(SLOT_COUNT - 1)));
        assert!(todos.contains(&FormField::Completed));
        assert!(!todos.contains(&FormField::CountryJp));
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = DetailForm::for_create(ApiDialect::Items);
        form.prev_field();
        assert_eq!(form.focused(), FormField::PrefectureEn);
        form.next_field();
        assert_eq!(form.focused(), FormField::Title);
    }
}

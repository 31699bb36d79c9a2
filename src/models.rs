use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Number of (date, quantity) pairs a todo carries
pub const SLOT_COUNT: usize = 6;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which flavour of the record API the server speaks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiDialect {
    /// Items: `public_type` strings, integer flags, `PUT /api/items/{id}`
    #[default]
    Items,
    /// Todos: `is_public` booleans, schedule slots, `POST /api/update`
    Todos,
}

impl ApiDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiDialect::Items => "items",
            ApiDialect::Todos => "todos",
        }
    }

    /// Singular noun used in titles and messages
    pub fn noun(&self) -> &'static str {
        match self {
            ApiDialect::Items => "item",
            ApiDialect::Todos => "todo",
        }
    }
}

/// Visibility radio group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }

    pub fn from_public(is_public: bool) -> Self {
        if is_public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// Food tags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Food {
    Orange,
    Apple,
    Banana,
    Melon,
    Grape,
}

impl Food {
    pub const ALL: [Food; 5] = [Food::Orange, Food::Apple, Food::Banana, Food::Melon, Food::Grape];

    /// Wire field name
    pub fn key(&self) -> &'static str {
        match self {
            Food::Orange => "food_orange",
            Food::Apple => "food_apple",
            Food::Banana => "food_banana",
            Food::Melon => "food_melon",
            Food::Grape => "food_grape",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Food::Orange => "Orange",
            Food::Apple => "Apple",
            Food::Banana => "Banana",
            Food::Melon => "Melon",
            Food::Grape => "Grape",
        }
    }
}

/// Category tags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Drink,
    Gadget,
    Sport,
    Government,
    Internet,
    Smartphone,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Drink,
        Category::Gadget,
        Category::Sport,
        Category::Government,
        Category::Internet,
        Category::Smartphone,
    ];

    /// Wire field name
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "category_food",
            Category::Drink => "category_drink",
            Category::Gadget => "category_gadget",
            Category::Sport => "category_sport",
            Category::Government => "category_government",
            Category::Internet => "category_internet",
            Category::Smartphone => "category_smartphone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Drink => "Drink",
            Category::Gadget => "Gadget",
            Category::Sport => "Sport",
            Category::Government => "Government",
            Category::Internet => "Internet",
            Category::Smartphone => "Smartphone",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoodFlags {
    pub orange: bool,
    pub apple: bool,
    pub banana: bool,
    pub melon: bool,
    pub grape: bool,
}

impl FoodFlags {
    pub fn get(&self, food: Food) -> bool {
        match food {
            Food::Orange => self.orange,
            Food::Apple => self.apple,
            Food::Banana => self.banana,
            Food::Melon => self.melon,
            Food::Grape => self.grape,
        }
    }

    pub fn set(&mut self, food: Food, value: bool) {
        let slot = match food {
            Food::Orange => &mut self.orange,
            Food::Apple => &mut self.apple,
            Food::Banana => &mut self.banana,
            Food::Melon => &mut self.melon,
            Food::Grape => &mut self.grape,
        };
        *slot = value;
    }

    pub fn toggle(&mut self, food: Food) {
        self.set(food, !self.get(food));
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryFlags {
    pub food: bool,
    pub drink: bool,
    pub gadget: bool,
    pub sport: bool,
    pub government: bool,
    pub internet: bool,
    pub smartphone: bool,
}

impl CategoryFlags {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Food => self.food,
            Category::Drink => self.drink,
            Category::Gadget => self.gadget,
            Category::Sport => self.sport,
            Category::Government => self.government,
            Category::Internet => self.internet,
            Category::Smartphone => self.smartphone,
        }
    }

    pub fn set(&mut self, category: Category, value: bool) {
        let slot = match category {
            Category::Food => &mut self.food,
            Category::Drink => &mut self.drink,
            Category::Gadget => &mut self.gadget,
            Category::Sport => &mut self.sport,
            Category::Government => &mut self.government,
            Category::Internet => &mut self.internet,
            Category::Smartphone => &mut self.smartphone,
        };
        *slot = value;
    }

    pub fn toggle(&mut self, category: Category) {
        self.set(category, !self.get(category));
    }
}

/// Country / prefecture names in Japanese and English
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalizedNames {
    pub country_jp: String,
    pub country_en: String,
    pub prefecture_jp: String,
    pub prefecture_en: String,
}

/// One (date, quantity) pair of a todo schedule
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    pub date: Option<NaiveDate>,
    pub qty: String,
}

/// Everything the form edits: a record minus identifier and timestamps
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFields {
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub completed: bool,
    pub visibility: Visibility,
    pub foods: FoodFlags,
    pub categories: CategoryFlags,
    pub names: LocalizedNames,
    pub schedule: [Slot; SLOT_COUNT],
}

impl RecordFields {
    /// JSON request body in the shape the given dialect expects
    pub fn to_payload(&self, dialect: ApiDialect) -> Value {
        let mut body = Map::new();
        body.insert("title".into(), json!(self.title));
        body.insert("content".into(), json!(self.content));
        body.insert("content_type".into(), json!(self.content_type));
        body.insert("completed".into(), json!(self.completed));

        match dialect {
            ApiDialect::Items => {
                body.insert("public_type".into(), json!(self.visibility.as_str()));
            }
            ApiDialect::Todos => {
                body.insert("is_public".into(), json!(self.visibility.is_public()));
            }
        }

        // The SQLite backend stores tags as integer columns
        let flag = |on: bool| match dialect {
            ApiDialect::Items => json!(u8::from(on)),
            ApiDialect::Todos => json!(on),
        };
        for food in Food::ALL {
            body.insert(food.key().into(), flag(self.foods.get(food)));
        }
        for category in Category::ALL {
            body.insert(category.key().into(), flag(self.categories.get(category)));
        }

        body.insert("country_jp".into(), json!(self.names.country_jp));
        body.insert("country_en".into(), json!(self.names.country_en));
        body.insert("prefecture_jp".into(), json!(self.names.prefecture_jp));
        body.insert("prefecture_en".into(), json!(self.names.prefecture_en));

        for (i, slot) in self.schedule.iter().enumerate() {
            let n = i + 1;
            let date = slot.date.map(|d| d.format(DATE_FORMAT).to_string());
            let qty = if slot.qty.is_empty() { None } else { Some(slot.qty.clone()) };
            body.insert(format!("pub_date{}", n), json!(date));
            body.insert(format!("qty{}", n), json!(qty));
        }

        Value::Object(body)
    }
}

/// A persisted (or about to be persisted) record
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RecordWire")]
pub struct Record {
    /// Assigned by the server, never by the form
    pub id: Option<i64>,
    pub fields: RecordFields,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Record {
    /// Full JSON representation including identifier and timestamps
    pub fn to_json(&self, dialect: ApiDialect) -> Value {
        let mut value = self.fields.to_payload(dialect);
        if let Value::Object(map) = &mut value {
            map.insert("id".into(), json!(self.id));
            map.insert("created_at".into(), json!(self.created_at));
            map.insert("updated_at".into(), json!(self.updated_at));
        }
        value
    }
}

/// Lenient wire shape accepted from both backends
#[derive(Deserialize, Default)]
#[serde(default)]
struct RecordWire {
    id: Option<i64>,
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "text")]
    content: String,
    #[serde(deserialize_with = "text")]
    content_type: String,
    #[serde(deserialize_with = "flag")]
    completed: bool,
    public_type: Option<String>,
    #[serde(deserialize_with = "optional_flag")]
    is_public: Option<bool>,

    #[serde(deserialize_with = "flag")]
    food_orange: bool,
    #[serde(deserialize_with = "flag")]
    food_apple: bool,
    #[serde(deserialize_with = "flag")]
    food_banana: bool,
    #[serde(deserialize_with = "flag")]
    food_melon: bool,
    #[serde(deserialize_with = "flag")]
    food_grape: bool,

    #[serde(deserialize_with = "flag")]
    category_food: bool,
    #[serde(deserialize_with = "flag")]
    category_drink: bool,
    #[serde(deserialize_with = "flag")]
    category_gadget: bool,
    #[serde(deserialize_with = "flag")]
    category_sport: bool,
    #[serde(deserialize_with = "flag")]
    category_government: bool,
    #[serde(deserialize_with = "flag")]
    category_internet: bool,
    #[serde(deserialize_with = "flag")]
    category_smartphone: bool,

    #[serde(deserialize_with = "text")]
    country_jp: String,
    #[serde(deserialize_with = "text")]
    country_en: String,
    #[serde(deserialize_with = "text")]
    prefecture_jp: String,
    #[serde(deserialize_with = "text")]
    prefecture_en: String,

    #[serde(deserialize_with = "date")]
    pub_date1: Option<NaiveDate>,
    #[serde(deserialize_with = "date")]
    pub_date2: Option<NaiveDate>,
    #[serde(deserialize_with = "date")]
    pub_date3: Option<NaiveDate>,
    #[serde(deserialize_with = "date")]
    pub_date4: Option<NaiveDate>,
    #[serde(deserialize_with = "date")]
    pub_date5: Option<NaiveDate>,
    #[serde(deserialize_with = "date")]
    pub_date6: Option<NaiveDate>,
    #[serde(deserialize_with = "text")]
    qty1: String,
    #[serde(deserialize_with = "text")]
    qty2: String,
    #[serde(deserialize_with = "text")]
    qty3: String,
    #[serde(deserialize_with = "text")]
    qty4: String,
    #[serde(deserialize_with = "text")]
    qty5: String,
    #[serde(deserialize_with = "text")]
    qty6: String,

    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<RecordWire> for Record {
    fn from(w: RecordWire) -> Self {
        let visibility = match (w.public_type.as_deref(), w.is_public) {
            (Some("private"), _) => Visibility::Private,
            (Some(_), _) => Visibility::Public,
            (None, Some(is_public)) => Visibility::from_public(is_public),
            (None, None) => Visibility::default(),
        };

        let slot = |date, qty| Slot { date, qty };

        Record {
            id: w.id,
            fields: RecordFields {
                title: w.title,
                content: w.content,
                content_type: w.content_type,
                completed: w.completed,
                visibility,
                foods: FoodFlags {
                    orange: w.food_orange,
                    apple: w.food_apple,
                    banana: w.food_banana,
                    melon: w.food_melon,
                    grape: w.food_grape,
                },
                categories: CategoryFlags {
                    food: w.category_food,
                    drink: w.category_drink,
                    gadget: w.category_gadget,
                    sport: w.category_sport,
                    government: w.category_government,
                    internet: w.category_internet,
                    smartphone: w.category_smartphone,
                },
                names: LocalizedNames {
                    country_jp: w.country_jp,
                    country_en: w.country_en,
                    prefecture_jp: w.prefecture_jp,
                    prefecture_en: w.prefecture_en,
                },
                schedule: [
                    slot(w.pub_date1, w.qty1),
                    slot(w.pub_date2, w.qty2),
                    slot(w.pub_date3, w.qty3),
                    slot(w.pub_date4, w.qty4),
                    slot(w.pub_date5, w.qty5),
                    slot(w.pub_date6, w.qty6),
                ],
            },
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Parse a `YYYY-MM-DD` date as typed into the form
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// null, strings and numbers all become text
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(de::Error::custom(format!("expected text, got {}", other))),
    }
}

// booleans, 0/1 integers and null
fn optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().map(|v| v != 0.0).unwrap_or(false))),
        Some(other) => Err(de::Error::custom(format!("expected flag, got {}", other))),
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(optional_flag(deserializer)?.unwrap_or(false))
}

fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid date '{}': {}", s, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let fields = RecordFields::default();
        assert_eq!(fields.visibility, Visibility::Public);
        assert!(Food::ALL.iter().all(|f| !fields.foods.get(*f)));
        assert!(Category::ALL.iter().all(|c| !fields.categories.get(*c)));
        assert!(fields.title.is_empty());
        assert!(fields.schedule.iter().all(|s| s.date.is_none() && s.qty.is_empty()));
    }

    #[test]
    fn test_parse_sqlite_item() {
        let json = r#"{
            "id": 7, "title": "Tea", "content": null, "content_type": "memo",
            "public_type": "private", "food_apple": 1, "food_grape": 0,
            "category_drink": 1, "country_jp": "日本", "country_en": "Japan",
            "created_at": "2024-05-01 10:00:00"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.fields.title, "Tea");
        assert_eq!(record.fields.content, "");
        assert_eq!(record.fields.visibility, Visibility::Private);
        assert!(record.fields.foods.apple);
        assert!(!record.fields.foods.grape);
        assert!(record.fields.categories.drink);
        assert_eq!(record.fields.names.country_en, "Japan");
        assert_eq!(record.created_at.as_deref(), Some("2024-05-01 10:00:00"));
    }

    #[test]
    fn test_parse_postgres_todo() {
        let json = r#"{
            "id": 3, "title": "Ship", "completed": true, "is_public": false,
            "food_melon": true, "pub_date1": "2024-02-29", "qty1": "12",
            "pub_date2": null, "qty2": null, "pub_date3": ""
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.fields.completed);
        assert_eq!(record.fields.visibility, Visibility::Private);
        assert!(record.fields.foods.melon);
        assert_eq!(record.fields.schedule[0].date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(record.fields.schedule[0].qty, "12");
        assert_eq!(record.fields.schedule[1], Slot::default());
        assert_eq!(record.fields.schedule[2].date, None);
    }

    #[test]
    fn test_rejects_bad_date() {
        let json = r#"{"id": 1, "title": "x", "pub_date1": "tomorrow"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn test_items_payload_uses_integer_flags() {
        let mut fields = RecordFields {
            title: "A".into(),
            visibility: Visibility::Private,
            ..Default::default()
        };
        fields.foods.toggle(Food::Banana);
        fields.categories.toggle(Category::Sport);

        let payload = fields.to_payload(ApiDialect::Items);
        assert_eq!(payload["public_type"], "private");
        assert_eq!(payload["food_banana"], 1);
        assert_eq!(payload["food_apple"], 0);
        assert_eq!(payload["category_sport"], 1);
        assert!(payload.get("is_public").is_none());
        assert!(payload.get("id").is_none());
        assert!(payload.get("created_at").is_none());
    }

    #[test]
    fn test_todos_payload_uses_booleans_and_slots() {
        let mut fields = RecordFields {
            title: "B".into(),
            ..Default::default()
        };
        fields.foods.set(Food::Orange, true);
        fields.schedule[4] = Slot {
            date: parse_date("2025-01-09"),
            qty: "3".into(),
        };

        let payload = fields.to_payload(ApiDialect::Todos);
        assert_eq!(payload["is_public"], true);
        assert_eq!(payload["food_orange"], true);
        assert_eq!(payload["pub_date5"], "2025-01-09");
        assert_eq!(payload["qty5"], "3");
        assert_eq!(payload["pub_date1"], Value::Null);
        assert_eq!(payload["qty1"], Value::Null);
    }

    #[test]
    fn test_record_json_round_trips_fields() {
        let record = Record {
            id: Some(9),
            fields: RecordFields {
                title: "C".into(),
                completed: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let back: Record = serde_json::from_value(record.to_json(ApiDialect::Todos)).unwrap();
        assert_eq!(back, record);
    }
}

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

pub const DEFAULT_UNIT: &str = "pcs";
pub const DEFAULT_QUANTITY: f64 = 1.0;

// Keys of a product node in the document.
pub(crate) const ID_KEY: &str = "Id";
const NAME_KEY: &str = "Name";
const UNIT_KEY: &str = "Unit";
const QUANTITY_KEY: &str = "Quantity";
const PURCHASED_KEY: &str = "Purchased";
const CATEGORY_KEY: &str = "Category";
const OPTIONAL_KEY: &str = "Optional";
const STORE_KEY: &str = "Store";

/// A product on the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub purchased: bool,
    pub category: String,
    pub optional: bool,
    pub store: String,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    /// New in-memory record with a fresh id and default fields.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(new_id())
    }

    /// Record with the given id and every other field at its default.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            unit: DEFAULT_UNIT.to_string(),
            quantity: DEFAULT_QUANTITY,
            purchased: false,
            category: String::new(),
            optional: false,
            store: String::new(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// True when every field but the id still holds its default, which is how
    /// [`crate::RecordRepository::load`] reports a missing record.
    #[must_use]
    pub fn is_empty_shell(&self) -> bool {
        *self == Self::with_id(self.id.clone())
    }

    /// Decodes a product node. Malformed or missing fields fall back to their
    /// defaults; a missing id is replaced with a fresh one.
    pub(crate) fn from_node(node: &Value) -> Self {
        let id = match node.get(ID_KEY).and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => {
                let id = new_id();
                log::warn!("Product node without an id; assigned {id}");
                id
            }
        };
        Self {
            id,
            name: read_string(node, NAME_KEY).unwrap_or_default(),
            unit: read_string(node, UNIT_KEY).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            quantity: read_number(node, QUANTITY_KEY).unwrap_or(DEFAULT_QUANTITY),
            purchased: read_bool(node, PURCHASED_KEY).unwrap_or(false),
            category: read_string(node, CATEGORY_KEY).unwrap_or_default(),
            optional: read_bool(node, OPTIONAL_KEY).unwrap_or(false),
            store: read_string(node, STORE_KEY).unwrap_or_default(),
        }
    }

    /// Overwrites the record's fields on an existing node, keeping any keys the
    /// record does not know about.
    pub(crate) fn write_into(&self, node: &mut Map<String, Value>) {
        node.insert(ID_KEY.to_string(), Value::String(self.id.clone()));
        node.insert(NAME_KEY.to_string(), Value::String(self.name.clone()));
        node.insert(UNIT_KEY.to_string(), Value::String(self.unit.clone()));
        node.insert(QUANTITY_KEY.to_string(), Value::from(self.quantity));
        node.insert(PURCHASED_KEY.to_string(), Value::Bool(self.purchased));
        node.insert(CATEGORY_KEY.to_string(), Value::String(self.category.clone()));
        node.insert(OPTIONAL_KEY.to_string(), Value::Bool(self.optional));
        node.insert(STORE_KEY.to_string(), Value::String(self.store.clone()));
    }

    pub(crate) fn to_node(&self) -> Value {
        let mut node = Map::new();
        self.write_into(&mut node);
        Value::Object(node)
    }
}

pub(crate) fn node_id(node: &Value) -> Option<&str> {
    node.get(ID_KEY).and_then(Value::as_str)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn read_string(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_number(node: &Value, key: &str) -> Option<f64> {
    match node.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|q| q.is_finite()),
        _ => None,
    }
}

fn read_bool(node: &Value, key: &str) -> Option<bool> {
    match node.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

//! Bridging between a TOML block's structural handle and the plain mapping
//!
//! The handle (`toml_edit::DocumentMut`) keeps comments, ordering and inline
//! formatting. Edits go through the plain [`Metadata`] view; before saving,
//! only the fields that actually differ are written back into the handle.

use crate::core::metadata::Metadata;
use serde_json::{Map, Number, Value as JsonValue};
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value};

/// Plain mapping view of a parsed TOML block
pub fn to_metadata(doc: &DocumentMut) -> Metadata {
    Metadata::from_map(table_to_map(doc.as_table()))
}

/// Make `doc` match `metadata` field for field
///
/// Keys whose value is unchanged are left alone so their original text
/// survives. Changed keys are rewritten in place, new keys are appended and
/// keys missing from `metadata` are removed.
pub fn apply_metadata(doc: &mut DocumentMut, metadata: &Metadata) {
    let stale: Vec<String> = doc
        .as_table()
        .iter()
        .map(|(key, _)| key.to_string())
        .filter(|key| !metadata.contains(key))
        .collect();
    for key in stale {
        doc.remove(&key);
    }

    for (key, wanted) in metadata.as_map() {
        // checked before conversion: `nan` and `inf` read back as null and
        // must stay untouched while the mapping still holds them
        if let Some(existing) = doc.get(key) {
            if item_to_json(existing).as_ref() == Some(wanted) {
                continue;
            }
        }

        let Some(new_value) = json_to_toml(wanted) else {
            doc.remove(key);
            continue;
        };

        match doc.get_mut(key) {
            Some(existing) => *existing = replacement_item(existing, new_value),
            None => {
                doc.insert(key, Item::Value(new_value));
            }
        }
    }
}

/// Keep the decor (surrounding whitespace and trailing comment) of a value
/// being overwritten
fn replacement_item(existing: &Item, mut new_value: Value) -> Item {
    if let Item::Value(old) = existing {
        *new_value.decor_mut() = old.decor().clone();
    }
    Item::Value(new_value)
}

fn table_to_map(table: &Table) -> Map<String, JsonValue> {
    table
        .iter()
        .filter_map(|(key, item)| Some((key.to_string(), item_to_json(item)?)))
        .collect()
}

fn item_to_json(item: &Item) -> Option<JsonValue> {
    match item {
        Item::None => None,
        Item::Value(value) => Some(value_to_json(value)),
        Item::Table(table) => Some(JsonValue::Object(table_to_map(table))),
        Item::ArrayOfTables(tables) => Some(JsonValue::Array(
            tables
                .iter()
                .map(|t| JsonValue::Object(table_to_map(t)))
                .collect(),
        )),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.value().clone()),
        Value::Integer(i) => JsonValue::Number((*i.value()).into()),
        Value::Float(f) => Number::from_f64(*f.value())
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Boolean(b) => JsonValue::Bool(*b.value()),
        // dates are carried as text; the mapping has no datetime type
        Value::Datetime(dt) => JsonValue::String(dt.value().to_string()),
        Value::Array(array) => JsonValue::Array(array.iter().map(value_to_json).collect()),
        Value::InlineTable(table) => JsonValue::Object(
            table
                .iter()
                .map(|(k, v)| (k.to_string(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// TOML value for a mapping value; `None` for null, which TOML cannot hold
fn json_to_toml(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Value::from(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::from(i)),
            None => n.as_f64().map(Value::from),
        },
        JsonValue::String(s) => Some(Value::from(s.as_str())),
        JsonValue::Array(items) => {
            let mut array = Array::new();
            for item in items.iter().filter_map(json_to_toml) {
                array.push(item);
            }
            Some(Value::Array(array))
        }
        JsonValue::Object(map) => {
            let mut table = InlineTable::new();
            for (key, item) in map {
                if let Some(item) = json_to_toml(item) {
                    table.insert(key.as_str(), item);
                }
            }
            Some(Value::InlineTable(table))
        }
    }
}

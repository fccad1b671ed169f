//! Ordered front matter mapping with typed field accessors
//!
//! Values are held as `serde_json::Value` regardless of the block's on-disk
//! format, so list/label logic never needs to know where a field came from.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Ordered mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already parsed JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field names in their current order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Insert or replace a field, keeping its position if it already exists
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a field without disturbing the order of the others
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    /// Read a field as a list of strings
    ///
    /// A lone scalar becomes a one-element list; nested mappings and nulls
    /// read as empty.
    pub fn get_list(&self, field: &str) -> Vec<String> {
        match self.fields.get(field) {
            None | Some(Value::Null) | Some(Value::Object(_)) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
            Some(scalar) => vec![value_to_string(scalar)],
        }
    }

    /// Store a list field verbatim; an empty list removes the field
    pub fn set_list<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect();

        if values.is_empty() {
            self.remove(field);
        } else {
            self.insert(field, Value::Array(values));
        }
    }

    /// Read a field as a single string
    pub fn get_scalar(&self, field: &str) -> Option<String> {
        match self.fields.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_to_string(value)),
        }
    }

    /// Store a label field; `None` removes it
    pub fn set_scalar(&mut self, field: &str, value: Option<&str>) {
        match value {
            Some(v) => {
                self.insert(field, Value::String(v.to_string()));
            }
            None => {
                self.remove(field);
            }
        }
    }

    /// The `title` field, or an empty string
    pub fn title(&self) -> String {
        self.get_scalar("title").unwrap_or_default()
    }

    /// The `date` field parsed at second resolution, timezone discarded
    pub fn get_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.get_scalar("date")?)
    }
}

/// String form of a value as used by list and label accessors
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn offset_suffix() -> &'static Regex {
    static OFFSET: OnceLock<Regex> = OnceLock::new();
    OFFSET.get_or_init(|| {
        Regex::new(r"(?:[Zz]|[+-]\d{2}:?\d{2})\z").expect("offset pattern is valid")
    })
}

/// Parse a front matter date
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS`,
/// tried in that order. A trailing UTC offset is stripped first; only the
/// calendar reading is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let cleaned = if cleaned.len() > 10 {
        offset_suffix().replace(cleaned, "").into_owned()
    } else {
        cleaned.to_string()
    };

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(&cleaned, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

//! # Type Coercion
//!
//! Turns a raw submitted JSON value into what gets stored for a field of a given
//! declared type: a raw text mirror (`field_value`) plus exactly one typed column.
//!
//! The rules live in one table, `COERCIONS`, mapping each `FieldType` to its
//! coercion function:
//!
//! | type                              | typed column    | on bad input          |
//! |-----------------------------------|-----------------|-----------------------|
//! | `number`                          | `value_number`  | null                  |
//! | `date`                            | `value_date`    | null                  |
//! | `checkbox`                        | `value_boolean` | false                 |
//! | `multiselect`                     | `value_text`    | `[]`                  |
//! | `text`, `textarea`, `radio`, `time` | `value_text`  | stored verbatim       |
//!
//! Coercion never fails. A malformed number or date is stored as null while
//! `field_value` still keeps what was sent.

use chrono::NaiveDate;
use common::model::field::FieldType;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date pattern")
});

const CHECKBOX_TRUE: [&str; 4] = ["true", "1", "yes", "on"];

/// The typed half of a stored value. Each variant owns exactly one column.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Number(Option<f64>),
    Date(Option<NaiveDate>),
    Boolean(bool),
}

/// Everything written to an `observation_data` row for one submitted value.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    /// Text mirror of the submitted value, empty for null.
    pub raw: String,
    pub typed: TypedValue,
}

impl StoredValue {
    pub fn value_text(&self) -> Option<&str> {
        match &self.typed {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn value_number(&self) -> Option<f64> {
        match self.typed {
            TypedValue::Number(n) => n,
            _ => None,
        }
    }

    pub fn value_date(&self) -> Option<NaiveDate> {
        match self.typed {
            TypedValue::Date(d) => d,
            _ => None,
        }
    }

    pub fn value_boolean(&self) -> Option<bool> {
        match self.typed {
            TypedValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

type Coercer = fn(&Value) -> TypedValue;

const COERCIONS: [(FieldType, Coercer); 8] = [
    (FieldType::Text, coerce_text),
    (FieldType::Textarea, coerce_text),
    (FieldType::Radio, coerce_text),
    (FieldType::Time, coerce_text),
    (FieldType::Number, coerce_number),
    (FieldType::Date, coerce_date),
    (FieldType::Checkbox, coerce_checkbox),
    (FieldType::Multiselect, coerce_multiselect),
];

fn coercer_for(field_type: FieldType) -> Coercer {
    COERCIONS
        .iter()
        .find(|(t, _)| *t == field_type)
        .map(|(_, f)| *f)
        .unwrap_or(coerce_text)
}

/// Coerces `value` for a field declared as `field_type`.
pub fn coerce(field_type: FieldType, value: &Value) -> StoredValue {
    StoredValue {
        raw: raw_mirror(value),
        typed: coercer_for(field_type)(value),
    }
}

/// Text form of any submitted value: strings verbatim, null as empty, anything
/// else as compact JSON.
pub fn raw_mirror(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn coerce_text(value: &Value) -> TypedValue {
    TypedValue::Text(raw_mirror(value))
}

fn coerce_number(value: &Value) -> TypedValue {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    // NaN and infinities have no column representation.
    TypedValue::Number(parsed.filter(|n| n.is_finite()))
}

fn coerce_date(value: &Value) -> TypedValue {
    let parsed = match value {
        Value::String(s) if ISO_DATE.is_match(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    };
    TypedValue::Date(parsed)
}

fn coerce_checkbox(value: &Value) -> TypedValue {
    let lowered = raw_mirror(value).to_lowercase();
    TypedValue::Boolean(CHECKBOX_TRUE.contains(&lowered.as_str()))
}

fn coerce_multiselect(value: &Value) -> TypedValue {
    let items: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            _ => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Value::String(part.to_string()))
                .collect(),
        },
        _ => Vec::new(),
    };
    TypedValue::Text(Value::Array(items).to_string())
}

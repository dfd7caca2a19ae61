//! Generic Row Editor
//!
//! Detail and edit views work on the row's raw JSON so one implementation
//! covers every resource. Only scalar fields are editable.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditField {
    pub name: String,
    pub value: String,
    pub kind: FieldKind,
}

/// Scalar fields of `row` other than its identifier
pub fn editable_fields(row: &Value, id_field: &str) -> Vec<EditField> {
    let Some(object) = row.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .filter(|(name, _)| name.as_str() != id_field)
        .filter_map(|(name, value)| {
            let (value, kind) = match value {
                Value::String(s) => (s.clone(), FieldKind::Text),
                Value::Null => (String::new(), FieldKind::Text),
                Value::Number(n) => (n.to_string(), FieldKind::Number),
                Value::Bool(b) => (b.to_string(), FieldKind::Flag),
                Value::Array(_) | Value::Object(_) => return None,
            };
            Some(EditField { name: name.clone(), value, kind })
        })
        .collect()
}

fn parse_number(field: &EditField) -> Result<Value, String> {
    let text = field.value.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("{} must be a number", field.name))
}

/// `row` with the edited fields written back in their original JSON types.
///
/// Empty text stays `null` when the field was `null`.
pub fn build_body(row: &Value, fields: &[EditField]) -> Result<Value, String> {
    let mut object: Map<String, Value> = row.as_object().cloned().unwrap_or_default();
    for field in fields {
        let was_null = object.get(&field.name).is_some_and(Value::is_null);
        let value = match field.kind {
            FieldKind::Text if was_null && field.value.is_empty() => Value::Null,
            FieldKind::Text => Value::String(field.value.clone()),
            FieldKind::Number => parse_number(field)?,
            FieldKind::Flag => Value::Bool(field.value == "true"),
        };
        object.insert(field.name.clone(), value);
    }
    Ok(Value::Object(object))
}

/// Cell text for the detail view
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "—".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

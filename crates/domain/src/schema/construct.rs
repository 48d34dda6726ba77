//! Building a conformant document tree from a schema and a candidate source.
//!
//! Construction is all-or-nothing: the first violated constraint aborts the whole
//! tree and nothing partially built escapes.

use serde_json::{Map, Value};

use super::field::{FieldDescriptor, FieldKind, SchemaFields};
use super::violation::{Constraint, FieldPath, SchemaViolation};
use crate::value::{number, numeric};

/// Construct a document tree from `source`.
///
/// - absent fields take their default
/// - unambiguous casts are applied (numeric strings to numbers, `null` to the
///   field's empty value when it is not nullable)
/// - keys the schema does not declare are dropped
pub fn construct(fields: &SchemaFields, source: &Value) -> Result<Value, SchemaViolation> {
    let root = FieldPath::root();
    let empty = Map::new();
    let source = match source {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(SchemaViolation::new(
                root,
                Constraint::Type { expected: "object" },
            ))
        }
    };
    construct_object(fields, source, &root).map(Value::Object)
}

fn construct_object(
    fields: &SchemaFields,
    source: &Map<String, Value>,
    path: &FieldPath,
) -> Result<Map<String, Value>, SchemaViolation> {
    let mut out = Map::new();
    for (name, field) in fields.iter() {
        let field_path = path.child(name);
        if let Some(value) = construct_field(field, source.get(name), &field_path)? {
            out.insert(name.to_string(), value);
        }
    }
    Ok(out)
}

fn construct_field(
    field: &FieldDescriptor,
    value: Option<&Value>,
    path: &FieldPath,
) -> Result<Option<Value>, SchemaViolation> {
    match value {
        Some(value) => clean(field, value, path).map(Some),
        None => match field.default_value() {
            Some(default) => clean(field, &default, path).map(Some),
            None if field.required => Err(SchemaViolation::new(path.clone(), Constraint::Required)),
            None => Ok(None),
        },
    }
}

fn clean(field: &FieldDescriptor, value: &Value, path: &FieldPath) -> Result<Value, SchemaViolation> {
    let blank_number = matches!(field.kind, FieldKind::Number)
        && value.as_str().is_some_and(|s| s.trim().is_empty());
    if value.is_null() || blank_number {
        if field.nullable {
            return Ok(Value::Null);
        }
        let empty = field.empty_value();
        if empty.is_null() {
            return Err(SchemaViolation::new(path.clone(), Constraint::NotNullable));
        }
        return cast(field, &empty, path);
    }
    cast(field, value, path)
}

fn cast(field: &FieldDescriptor, value: &Value, path: &FieldPath) -> Result<Value, SchemaViolation> {
    let violation = |constraint| SchemaViolation::new(path.clone(), constraint);
    let wrong_type = || violation(Constraint::Type {
        expected: field.kind.type_name(),
    });

    match &field.kind {
        kind if kind.is_textual() => {
            let mut text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(wrong_type()),
            };
            if text.is_empty() && !field.blank {
                match field.initial.as_ref().and_then(Value::as_str) {
                    Some(initial) if !initial.is_empty() => text = initial.to_string(),
                    _ if field.nullable => return Ok(Value::Null),
                    _ => return Err(violation(Constraint::Blank)),
                }
            }
            let blank_allowed = text.is_empty() && field.blank;
            if !field.choices.is_empty() && !blank_allowed && !field.choices.contains(&text) {
                return Err(violation(Constraint::Choice {
                    allowed: field.choices.clone(),
                }));
            }
            Ok(Value::String(text))
        }
        FieldKind::Number => {
            let n = numeric(value).ok_or_else(wrong_type)?;
            if field.integer && n.fract() != 0.0 {
                return Err(violation(Constraint::Integer));
            }
            if let Some(min) = field.min {
                if n < min {
                    return Err(violation(Constraint::Minimum(min)));
                }
            }
            if let Some(max) = field.max {
                if n > max {
                    return Err(violation(Constraint::Maximum(max)));
                }
            }
            Ok(number(n))
        }
        FieldKind::Boolean => value.as_bool().map(Value::Bool).ok_or_else(wrong_type),
        FieldKind::Array(element) => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| clean(element, item, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::Set(element) => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            let mut out: Vec<Value> = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let cleaned = clean(element, item, &path.index(i))?;
                if !out.contains(&cleaned) {
                    out.push(cleaned);
                }
            }
            Ok(Value::Array(out))
        }
        FieldKind::Mapping { value: entry, .. } => {
            let map = value.as_object().ok_or_else(wrong_type)?;
            let mut out = Map::new();
            for (key, item) in map {
                out.insert(key.clone(), clean(entry, item, &path.child(key.as_str()))?);
            }
            Ok(Value::Object(out))
        }
        FieldKind::Object(fields) => {
            let map = value.as_object().ok_or_else(wrong_type)?;
            construct_object(fields, map, path).map(Value::Object)
        }
        FieldKind::Any => value
            .as_object()
            .map(|map| Value::Object(map.clone()))
            .ok_or_else(wrong_type),
        _ => Err(wrong_type()),
    }
}

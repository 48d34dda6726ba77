//! Rules for items that can be activated: durations, targets, ranges, uses and
//! resource consumption.

use serde_json::{Map, Value};

use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};
use crate::value::{number, numeric, object_mut};

pub const RULES: &[MigrationRule] = &[
    MigrationRule::new("activated-effect.formula-fields", MigrationPass::Coercion, formula_fields),
    MigrationRule::new("activated-effect.range-fields", MigrationPass::Coercion, range_fields),
    MigrationRule::new("activated-effect.targets", MigrationPass::Coercion, targets),
    MigrationRule::new("activated-effect.uses", MigrationPass::Coercion, uses),
    MigrationRule::new("activated-effect.consume", MigrationPass::Coercion, consume),
    MigrationRule::new("activated-effect.range-split", MigrationPass::Structural, range_split),
];

/// Zero or null becomes an empty formula; other numbers are stringified.
fn formula_fields(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    for (parent, key) in [("uses", "max"), ("duration", "value")] {
        let Some(field) = object_mut(system, parent).and_then(|p| p.get_mut(key)) else {
            continue;
        };
        *field = match &*field {
            Value::Null => Value::String(String::new()),
            Value::String(s) if s == "0" => Value::String(String::new()),
            Value::Number(n) if n.as_f64() == Some(0.0) => Value::String(String::new()),
            Value::Number(n) => Value::String(n.to_string()),
            _ => continue,
        };
    }
}

/// Blank or numeric strings in a nullable number field; anything else is unreadable.
fn coerce_number_string(
    parent: &mut Map<String, Value>,
    key: &str,
    path: &str,
    notes: &mut MigrationNotes,
) {
    let Some(Value::String(text)) = parent.get(key) else {
        return;
    };
    let resolved = if text.is_empty() {
        Value::Null
    } else if let Some(n) = numeric(&Value::String(text.clone())) {
        number(n)
    } else {
        notes.unrecognized(path, Value::String(text.clone()), Value::Null);
        Value::Null
    };
    parent.insert(key.to_string(), resolved);
}

fn null_to_blank(parent: &mut Map<String, Value>, key: &str) {
    if parent.get(key).is_some_and(Value::is_null) {
        parent.insert(key.to_string(), Value::String(String::new()));
    }
}

fn range_fields(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(range) = object_mut(system, "range") else {
        return;
    };
    null_to_blank(range, "units");
    coerce_number_string(range, "long", "range.long", notes);
}

/// Split a combined `"normal/long"` range string across `range.value` and `range.long`.
///
/// Segments that are not numeric are left where they were.
fn range_split(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(range) = object_mut(system, "range") else {
        return;
    };
    let Some(Value::String(text)) = range.get("value") else {
        return;
    };
    if text.is_empty() {
        range.insert("value".into(), Value::Null);
        return;
    }

    let text = text.clone();
    let mut segments = text.split('/');
    let normal = segments.next().map(|s| Value::String(s.to_string()));
    let long = segments.next().map(|s| Value::String(s.to_string()));

    match normal.as_ref().and_then(numeric) {
        Some(n) => {
            range.insert("value".into(), number(n));
        }
        None => notes.unrecognized("range.value", Value::String(text.clone()), Value::String(text)),
    }
    if let Some(n) = long.as_ref().and_then(numeric) {
        range.insert("long".into(), number(n));
    }
}

fn targets(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    let Some(target) = object_mut(system, "target") else {
        return;
    };
    if target.get("value").and_then(Value::as_str) == Some("") {
        target.insert("value".into(), Value::Null);
    }
    null_to_blank(target, "units");
    null_to_blank(target, "type");
}

fn uses(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(uses) = object_mut(system, "uses") else {
        return;
    };
    coerce_number_string(uses, "value", "uses.value", notes);
    if !uses.contains_key("recovery") {
        uses.insert("recovery".into(), Value::String(String::new()));
    }
}

fn consume(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(consume) = object_mut(system, "consume") else {
        return;
    };
    null_to_blank(consume, "type");
    coerce_number_string(consume, "amount", "consume.amount", notes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::MigrationPlan;
    use serde_json::json;

    fn migrate(source: Value) -> (Value, MigrationNotes) {
        let migrated = MigrationPlan::new(RULES.iter().copied()).apply(&source);
        (migrated.source, migrated.notes)
    }

    #[test]
    fn combined_range_splits_into_value_and_long() {
        let (doc, notes) = migrate(json!({"range": {"value": "100/400", "units": "ft"}}));
        assert_eq!(doc["range"], json!({"value": 100, "long": 400, "units": "ft"}));
        assert!(notes.is_empty());
    }

    #[test]
    fn single_range_leaves_long_alone() {
        let (doc, _) = migrate(json!({"range": {"value": "150", "long": 600}}));
        assert_eq!(doc["range"]["value"], json!(150));
        assert_eq!(doc["range"]["long"], json!(600));

        let (doc, _) = migrate(json!({"range": {"value": "150"}}));
        assert!(doc["range"].get("long").is_none());
    }

    #[test]
    fn non_numeric_left_segment_is_kept_as_is() {
        let (doc, notes) = migrate(json!({"range": {"value": "abc/400"}}));
        assert_eq!(doc["range"]["value"], json!("abc/400"));
        assert_eq!(doc["range"]["long"], json!(400));
        assert_eq!(notes.entries()[0].path, "range.value");
        assert_eq!(notes.entries()[0].rule, "activated-effect.range-split");
    }

    #[test]
    fn blank_range_value_becomes_null() {
        let (doc, _) = migrate(json!({"range": {"value": "", "long": "", "units": null}}));
        assert_eq!(doc["range"], json!({"value": null, "long": null, "units": ""}));
    }

    #[test]
    fn zero_and_null_formulas_become_blank() {
        let (doc, _) = migrate(json!({
            "uses": {"max": 0, "recovery": "1d4"},
            "duration": {"value": null, "units": "minute"}
        }));
        assert_eq!(doc["uses"]["max"], json!(""));
        assert_eq!(doc["duration"]["value"], json!(""));

        let (doc, _) = migrate(json!({"uses": {"max": "0"}, "duration": {"value": 10}}));
        assert_eq!(doc["uses"]["max"], json!(""));
        assert_eq!(doc["duration"]["value"], json!("10"));
    }

    #[test]
    fn numeric_formula_is_stringified() {
        let (doc, _) = migrate(json!({"uses": {"max": 3}}));
        assert_eq!(doc["uses"]["max"], json!("3"));
        assert_eq!(doc["uses"]["recovery"], json!(""));
    }

    #[test]
    fn uses_and_consume_strings_are_coerced() {
        let (doc, notes) = migrate(json!({
            "uses": {"value": "2", "max": "3"},
            "consume": {"type": null, "amount": "lots"}
        }));
        assert_eq!(doc["uses"]["value"], json!(2));
        assert_eq!(doc["consume"]["type"], json!(""));
        assert_eq!(doc["consume"]["amount"], Value::Null);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.entries()[0].found, json!("lots"));
    }

    #[test]
    fn blank_target_value_becomes_null() {
        let (doc, _) = migrate(json!({"target": {"value": "", "units": null, "type": null}}));
        assert_eq!(doc["target"], json!({"value": null, "units": "", "type": ""}));
    }

    #[test]
    fn second_run_changes_nothing() {
        let (once, _) = migrate(json!({
            "range": {"value": "100/400"},
            "uses": {"max": 0, "value": ""},
            "duration": {"value": 5}
        }));
        let (twice, notes) = migrate(once.clone());
        assert_eq!(once, twice);
        assert!(notes.is_empty());
    }
}

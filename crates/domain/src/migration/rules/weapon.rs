//! Weapon-specific rules.

use serde_json::{Map, Value};

use crate::config::WeaponType;
use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};

pub const RULES: &[MigrationRule] = &[
    MigrationRule::new("weapon.properties", MigrationPass::Coercion, properties),
    MigrationRule::new("weapon.proficient", MigrationPass::Coercion, proficient),
    MigrationRule::new("weapon.weapon-type", MigrationPass::Coercion, weapon_type),
];

/// Non-boolean property flags are discarded, not coerced.
fn properties(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    match system.get_mut("properties") {
        Some(Value::Object(flags)) => flags.retain(|_, flag| flag.is_boolean()),
        Some(Value::Null) | None => {}
        Some(_) => {
            if let Some(malformed) = system.remove("properties") {
                notes.unrecognized("properties", malformed, Value::Null);
            }
        }
    }
}

fn proficient(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    if let Some(n) = system.get("proficient").and_then(Value::as_f64) {
        system.insert("proficient".into(), Value::Bool(n != 0.0));
    }
}

fn weapon_type(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    if system.get("weaponType").is_some_and(Value::is_null) {
        system.insert(
            "weaponType".into(),
            Value::String(WeaponType::DEFAULT.key().to_string()),
        );
    }
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
    fn non_boolean_flags_are_dropped_silently() {
        let (doc, notes) = migrate(json!({
            "properties": {"fin": true, "hvy": "yes", "lgt": 1, "two": false, "custom": true}
        }));
        assert_eq!(doc["properties"], json!({"fin": true, "two": false, "custom": true}));
        assert!(notes.is_empty());
    }

    #[test]
    fn malformed_property_map_is_removed() {
        let (doc, notes) = migrate(json!({"properties": ["fin", "lgt"]}));
        assert!(doc.get("properties").is_none());
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn numeric_proficiency_becomes_boolean() {
        let (doc, _) = migrate(json!({"proficient": 1}));
        assert_eq!(doc["proficient"], json!(true));
        let (doc, _) = migrate(json!({"proficient": 0}));
        assert_eq!(doc["proficient"], json!(false));
    }

    #[test]
    fn null_weapon_type_defaults_to_simple_melee() {
        let (doc, _) = migrate(json!({"weaponType": null}));
        assert_eq!(doc["weaponType"], json!("simpleM"));
        let (doc, _) = migrate(json!({"weaponType": "martialR"}));
        assert_eq!(doc["weaponType"], json!("martialR"));
    }
}

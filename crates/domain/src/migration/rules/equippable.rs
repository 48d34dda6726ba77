//! Rules for items that can be equipped and attuned.

use serde_json::{json, Map, Value};

use crate::config::AttunementType;
use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};
use crate::value::truthy;

pub const RULES: &[MigrationRule] = &[
    MigrationRule::new("equippable.equipped", MigrationPass::Coercion, equipped),
    MigrationRule::new("equippable.attunement", MigrationPass::Semantic, attunement),
];

fn equipped(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    if system.get("equipped").unwrap_or(&Value::Null).is_null() {
        system.insert("equipped".into(), Value::Bool(false));
    }
}

/// The legacy `attuned` flag only fills an absent `attunement`; it never
/// overwrites one.
fn attunement(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    if system.contains_key("attunement") {
        return;
    }
    let Some(attuned) = system.get("attuned") else {
        return;
    };
    let state = if truthy(attuned) {
        AttunementType::Attuned
    } else {
        AttunementType::None
    };
    system.insert("attunement".into(), json!(state.code()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::MigrationPlan;

    fn migrate(source: Value) -> Value {
        MigrationPlan::new(RULES.iter().copied())
            .apply(&source)
            .source
    }

    #[test]
    fn attuned_flag_maps_to_attunement_state() {
        assert_eq!(migrate(json!({"attuned": true}))["attunement"], json!(2));
        assert_eq!(migrate(json!({"attuned": false}))["attunement"], json!(0));
    }

    #[test]
    fn explicit_attunement_is_never_overwritten() {
        let doc = migrate(json!({"attuned": true, "attunement": 1}));
        assert_eq!(doc["attunement"], json!(1));
        let doc = migrate(json!({"attuned": true, "attunement": null}));
        assert_eq!(doc["attunement"], Value::Null);
    }

    #[test]
    fn no_legacy_flag_leaves_attunement_absent() {
        assert!(migrate(json!({})).get("attunement").is_none());
    }

    #[test]
    fn missing_equipped_becomes_false() {
        assert_eq!(migrate(json!({}))["equipped"], json!(false));
        assert_eq!(migrate(json!({"equipped": null}))["equipped"], json!(false));
        assert_eq!(migrate(json!({"equipped": true}))["equipped"], json!(true));
    }
}

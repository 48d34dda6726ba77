//! Rules for items with a physical presence: price, rarity and weight.

use serde_json::{json, Map, Value};

use crate::config::{Currency, ItemRarity};
use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};
use crate::value::{number, numeric};

pub const RULES: &[MigrationRule] = &[
    MigrationRule::new("physical-item.weight", MigrationPass::Coercion, weight),
    MigrationRule::new("physical-item.price", MigrationPass::Structural, price),
    MigrationRule::new("physical-item.rarity", MigrationPass::Semantic, rarity),
];

fn weight(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    if system.get("weight").unwrap_or(&Value::Null).is_null() {
        system.insert("weight".into(), json!(0));
    }
}

/// A bare price becomes `{value, denomination}` in gold.
fn price(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let legacy = system.get("price").cloned().unwrap_or(Value::Null);
    if legacy.is_object() {
        return;
    }
    let value = match numeric(&legacy) {
        Some(n) => number(n),
        None => {
            if !legacy.is_null() && legacy.as_str() != Some("") {
                notes.unrecognized("price", legacy.clone(), json!(0));
            }
            json!(0)
        }
    };
    system.insert(
        "price".into(),
        json!({"value": value, "denomination": Currency::DEFAULT.key()}),
    );
}

/// Freeform rarity labels map to rarity keys, case-insensitively.
fn rarity(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(current) = system.get("rarity") else {
        return;
    };
    if let Some(key) = current.as_str() {
        if ItemRarity::from_key(key).is_some() {
            return;
        }
    }

    let resolved = match current {
        Value::String(label) => match ItemRarity::from_label(label) {
            Some(rarity) => rarity.key(),
            None => {
                if !label.is_empty() {
                    notes.unrecognized("rarity", current.clone(), json!(""));
                }
                ""
            }
        },
        Value::Null => "",
        other => {
            notes.unrecognized("rarity", other.clone(), json!(""));
            ""
        }
    };
    system.insert("rarity".into(), json!(resolved));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::MigrationPlan;

    fn migrate(source: Value) -> (Value, MigrationNotes) {
        let migrated = MigrationPlan::new(RULES.iter().copied()).apply(&source);
        (migrated.source, migrated.notes)
    }

    #[test]
    fn bare_price_becomes_gold_object() {
        let (doc, _) = migrate(json!({"price": 25}));
        assert_eq!(doc["price"], json!({"value": 25, "denomination": "gp"}));

        let (doc, _) = migrate(json!({"price": "12.5"}));
        assert_eq!(doc["price"], json!({"value": 12.5, "denomination": "gp"}));
    }

    #[test]
    fn null_price_becomes_zero_gold() {
        let (doc, notes) = migrate(json!({"price": null}));
        assert_eq!(doc["price"], json!({"value": 0, "denomination": "gp"}));
        assert!(notes.is_empty());
    }

    #[test]
    fn unreadable_price_is_noted() {
        let (doc, notes) = migrate(json!({"price": "cheap"}));
        assert_eq!(doc["price"]["value"], json!(0));
        assert_eq!(notes.entries()[0].path, "price");
    }

    #[test]
    fn price_object_is_untouched() {
        let source = json!({"price": {"value": 3, "denomination": "sp"}, "weight": 1});
        let (doc, _) = migrate(source.clone());
        assert_eq!(doc["price"], source["price"]);
    }

    #[test]
    fn rarity_labels_map_case_insensitively() {
        let (doc, _) = migrate(json!({"rarity": "Very Rare"}));
        assert_eq!(doc["rarity"], json!("veryRare"));
        let (doc, _) = migrate(json!({"rarity": "UNCOMMON"}));
        assert_eq!(doc["rarity"], json!("uncommon"));
        let (doc, _) = migrate(json!({"rarity": "legendary"}));
        assert_eq!(doc["rarity"], json!("legendary"));
    }

    #[test]
    fn unknown_rarity_becomes_blank() {
        let (doc, notes) = migrate(json!({"rarity": "mythic"}));
        assert_eq!(doc["rarity"], json!(""));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn absent_rarity_stays_absent() {
        let (doc, _) = migrate(json!({}));
        assert!(doc.get("rarity").is_none());
    }

    #[test]
    fn null_weight_becomes_zero() {
        let (doc, _) = migrate(json!({"weight": null}));
        assert_eq!(doc["weight"], json!(0));
        let (doc, _) = migrate(json!({}));
        assert_eq!(doc["weight"], json!(0));
    }
}

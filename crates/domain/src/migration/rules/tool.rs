//! Tool-specific rules.

use serde_json::{Map, Value};

use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};

pub const RULES: &[MigrationRule] = &[MigrationRule::new(
    "tool.ability",
    MigrationPass::Structural,
    ability,
)];

/// Tools used to list several abilities; only the first survives.
fn ability(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    let Some(Value::Array(abilities)) = system.get("ability") else {
        return;
    };
    match abilities.first().cloned() {
        Some(first) => system.insert("ability".into(), first),
        None => system.remove("ability"),
    };
}

//! Rules for the actor attribute fields shared by characters, NPCs and vehicles.

use serde_json::{Map, Value};

use crate::migration::{MigrationNotes, MigrationPass, MigrationRule};
use crate::value::{format_number, numeric, object_mut, truthy};

pub const RULES: &[MigrationRule] = &[
    MigrationRule::new("attributes.init-bonus", MigrationPass::Coercion, init_bonus),
    MigrationRule::new("attributes.init-fold", MigrationPass::CompositeMerge, init_fold),
];

fn init_mut(system: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    object_mut(system, "attributes").and_then(|attributes| object_mut(attributes, "init"))
}

/// Initiative bonus is a formula; numbers are stringified and zero means none.
fn init_bonus(system: &mut Map<String, Value>, _: &mut MigrationNotes) {
    let Some(init) = init_mut(system) else {
        return;
    };
    let bonus = match init.get("bonus") {
        Some(Value::Null) => String::new(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) if n != 0.0 => format_number(n),
            _ => String::new(),
        },
        _ => return,
    };
    init.insert("bonus".into(), Value::String(bonus));
}

/// Fold the old flat `init.value` into the `init.bonus` formula.
///
/// The folded key is removed so a second run finds nothing to fold.
fn init_fold(system: &mut Map<String, Value>, notes: &mut MigrationNotes) {
    let Some(init) = init_mut(system) else {
        return;
    };
    let Some(value) = init.remove("value") else {
        return;
    };
    if !truthy(&value) {
        return;
    }
    let Some(n) = numeric(&value) else {
        notes.unrecognized("attributes.init.value", value, Value::Null);
        return;
    };
    if n == 0.0 {
        return;
    }

    let bonus = init
        .get("bonus")
        .and_then(Value::as_str)
        .filter(|bonus| !bonus.is_empty());
    let folded = match bonus {
        Some(bonus) if n < 0.0 => format!("{bonus} - {}", format_number(-n)),
        Some(bonus) => format!("{bonus} + {}", format_number(n)),
        None => format_number(n),
    };
    init.insert("bonus".into(), Value::String(folded));
}

//! Versioned migration of persisted document trees.
//!
//! Every subtype owns a [`MigrationPlan`]: the rules contributed by its templates
//! and by the subtype itself, ordered by [`MigrationPass`]. Within a pass, rules
//! keep their registration order. A plan never fails; anything it cannot
//! interpret is replaced by a safe default and recorded as a [`LegacyValue`].

pub mod decision;
pub mod rules;

pub use decision::{decide, MigrationDecision};

use serde::Serialize;
use serde_json::{Map, Value};

/// The four passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPass {
    /// Normalize legacy encodings of scalar values
    Coercion,
    /// Rewrite fields whose shape changed
    Structural,
    /// Remap renamed or reinterpreted values
    Semantic,
    /// Fold fields that used to be split across keys
    CompositeMerge,
}

/// Signature of a rule body. Receives the document's `system` tree.
pub type RuleFn = fn(&mut Map<String, Value>, &mut MigrationNotes);

/// One field-level transformation.
#[derive(Clone, Copy)]
pub struct MigrationRule {
    pub id: &'static str,
    pub pass: MigrationPass,
    apply: RuleFn,
}

impl MigrationRule {
    pub const fn new(id: &'static str, pass: MigrationPass, apply: RuleFn) -> Self {
        Self { id, pass, apply }
    }
}

impl std::fmt::Debug for MigrationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationRule")
            .field("id", &self.id)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// A legacy value a rule could not interpret and replaced with a safe default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyValue {
    pub rule: &'static str,
    pub path: String,
    pub found: Value,
    pub resolved: Value,
}

/// Diagnostic notes collected during one document's migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationNotes {
    #[serde(skip)]
    current_rule: &'static str,
    entries: Vec<LegacyValue>,
}

impl MigrationNotes {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&mut self, rule: &'static str) {
        self.current_rule = rule;
    }

    /// Record an unrecognized value for the rule that is currently running.
    pub fn unrecognized(&mut self, path: &str, found: Value, resolved: Value) {
        self.entries.push(LegacyValue {
            rule: self.current_rule,
            path: path.to_string(),
            found,
            resolved,
        });
    }

    pub fn entries(&self) -> &[LegacyValue] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another set of notes into this one, prefixing their paths.
    pub fn absorb(&mut self, prefix: &str, other: MigrationNotes) {
        self.entries.extend(other.entries.into_iter().map(|mut entry| {
            entry.path = if entry.path.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", entry.path)
            };
            entry
        }));
    }
}

/// Result of running a plan over one source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub source: Value,
    pub notes: MigrationNotes,
}

impl Migrated {
    pub fn changed_from(&self, original: &Value) -> bool {
        &self.source != original
    }
}

/// Ordered rules for one subtype.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    rules: Vec<MigrationRule>,
}

impl MigrationPlan {
    /// Build a plan; rules are stably sorted by pass so registration order
    /// survives inside each pass.
    pub fn new(rules: impl IntoIterator<Item = MigrationRule>) -> Self {
        let mut rules: Vec<MigrationRule> = rules.into_iter().collect();
        rules.sort_by_key(|rule| rule.pass);
        Self { rules }
    }

    pub fn rules(&self) -> &[MigrationRule] {
        &self.rules
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.id)
    }

    /// Run every rule over a working copy of `source`. Rules are idempotent,
    /// so already-current trees pass through unchanged.
    pub fn apply(&self, source: &Value) -> Migrated {
        let mut notes = MigrationNotes::new();
        let mut working = match source {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                notes.enter("document");
                notes.unrecognized("", other.clone(), Value::Object(Map::new()));
                Map::new()
            }
        };

        for rule in &self.rules {
            notes.enter(rule.id);
            (rule.apply)(&mut working, &mut notes);
        }

        Migrated {
            source: Value::Object(working),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mark_structural(source: &mut Map<String, Value>, _: &mut MigrationNotes) {
        let seen = source.get("order").and_then(Value::as_str).unwrap_or("").to_string();
        source.insert("order".into(), json!(format!("{seen}S")));
    }

    fn mark_coercion(source: &mut Map<String, Value>, _: &mut MigrationNotes) {
        let seen = source.get("order").and_then(Value::as_str).unwrap_or("").to_string();
        source.insert("order".into(), json!(format!("{seen}C")));
    }

    fn complain(_: &mut Map<String, Value>, notes: &mut MigrationNotes) {
        notes.unrecognized("odd", json!("?"), Value::Null);
    }

    #[test]
    fn passes_run_in_fixed_order_regardless_of_registration() {
        let plan = MigrationPlan::new([
            MigrationRule::new("s", MigrationPass::Structural, mark_structural),
            MigrationRule::new("c", MigrationPass::Coercion, mark_coercion),
        ]);
        let migrated = plan.apply(&json!({}));
        assert_eq!(migrated.source["order"], json!("CS"));
        assert_eq!(plan.rule_ids().collect::<Vec<_>>(), vec!["c", "s"]);
    }

    #[test]
    fn notes_carry_the_running_rule_id() {
        let plan = MigrationPlan::new([MigrationRule::new("odd-rule", MigrationPass::Semantic, complain)]);
        let migrated = plan.apply(&json!({}));
        assert_eq!(migrated.notes.entries()[0].rule, "odd-rule");
        assert_eq!(migrated.notes.entries()[0].path, "odd");
    }

    #[test]
    fn non_object_source_becomes_empty_object() {
        let migrated = MigrationPlan::default().apply(&json!("garbage"));
        assert_eq!(migrated.source, json!({}));
        assert_eq!(migrated.notes.len(), 1);
    }

    #[test]
    fn absorb_prefixes_paths() {
        let mut outer = MigrationNotes::new();
        let mut inner = MigrationNotes::new();
        inner.unrecognized("price", json!("cheap"), json!(0));
        outer.absorb("items.abc", inner);
        assert_eq!(outer.entries()[0].path, "items.abc.price");
    }
}

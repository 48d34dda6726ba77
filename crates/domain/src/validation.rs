//! The validation gate: strict or permissive admission of constructed documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::document::DocumentKind;
use crate::ids::DocumentId;
use crate::notification::Notification;
use crate::schema::SchemaViolation;

/// Admission policy for documents that fail their schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// A violation rejects the document
    Strict,
    /// A violation flags the document invalid and keeps its data
    Permissive,
}

impl ValidationMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Permissive
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Where a document lives: its kind, the document embedding it, and its id.
///
/// Ids are only unique within one collection, so an embedded item can share
/// its `_id` with a world item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub parent: Option<DocumentId>,
    pub id: DocumentId,
}

impl DocumentRef {
    pub fn new(kind: DocumentKind, id: impl Into<DocumentId>) -> Self {
        Self {
            kind,
            parent: None,
            id: id.into(),
        }
    }

    pub fn embedded_in(mut self, parent: impl Into<DocumentId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} {}/{}", self.kind.as_str(), parent, self.id),
            None => write!(f, "{} {}", self.kind.as_str(), self.id),
        }
    }
}

/// A document that passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedDocument {
    pub id: DocumentRef,
    /// Constructed tree when valid; the migrated tree, untouched, when flagged
    pub system: Value,
    pub invalid: bool,
}

/// A document the gate refused.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Document {id} rejected: {violation}")]
pub struct RejectedDocument {
    pub id: DocumentRef,
    pub violation: SchemaViolation,
}

/// Side index of every document that failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidDocumentIndex {
    entries: BTreeMap<DocumentRef, SchemaViolation>,
}

impl InvalidDocumentIndex {
    pub fn insert(&mut self, id: DocumentRef, violation: SchemaViolation) {
        self.entries.insert(id, violation);
    }

    pub fn get(&self, id: &DocumentRef) -> Option<&SchemaViolation> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &DocumentRef) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentRef, &SchemaViolation)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strict mode was given up so the world can still load.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDowngrade {
    pub invalid: usize,
    pub notification: Notification,
}

/// Admits documents under a validation mode and remembers the invalid ones.
///
/// The mode is passed in explicitly and only changes through [`ValidationGate::review`].
#[derive(Debug, Clone)]
pub struct ValidationGate {
    mode: ValidationMode,
    invalid: InvalidDocumentIndex,
}

impl ValidationGate {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            invalid: InvalidDocumentIndex::default(),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn invalid_documents(&self) -> &InvalidDocumentIndex {
        &self.invalid
    }

    /// Admit or reject one document.
    ///
    /// `migrated` is what the document looked like before construction;
    /// permissive mode keeps it so no data is lost.
    pub fn admit(
        &mut self,
        id: DocumentRef,
        migrated: Value,
        constructed: Result<Value, SchemaViolation>,
    ) -> Result<AdmittedDocument, RejectedDocument> {
        match constructed {
            Ok(system) => Ok(AdmittedDocument {
                id,
                system,
                invalid: false,
            }),
            Err(violation) => {
                self.invalid.insert(id.clone(), violation.clone());
                match self.mode {
                    ValidationMode::Strict => Err(RejectedDocument { id, violation }),
                    ValidationMode::Permissive => Ok(AdmittedDocument {
                        id,
                        system: migrated,
                        invalid: true,
                    }),
                }
            }
        }
    }

    /// After a batch: if strict mode left invalid documents behind, switch to
    /// permissive. Happens at most once; the caller persists the change.
    pub fn review(&mut self) -> Option<ModeDowngrade> {
        if !self.mode.is_strict() || self.invalid.is_empty() {
            return None;
        }
        self.mode = ValidationMode::Permissive;
        Some(ModeDowngrade {
            invalid: self.invalid.len(),
            notification: Notification::strictness_downgraded(self.invalid.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Constraint, FieldPath};
    use serde_json::json;

    fn vehicle(id: &str) -> DocumentRef {
        DocumentRef::new(DocumentKind::Actor, id)
    }

    fn missing_name() -> SchemaViolation {
        SchemaViolation::new(FieldPath::from("cargo.crew.0.name"), Constraint::Required)
    }

    #[test]
    fn strict_mode_rejects_with_the_field_path() {
        let mut gate = ValidationGate::new(ValidationMode::Strict);
        let rejected = gate
            .admit(vehicle("v1"), json!({}), Err(missing_name()))
            .unwrap_err();
        assert_eq!(rejected.violation.path.to_string(), "cargo.crew.0.name");
        assert!(gate.invalid_documents().contains(&vehicle("v1")));
    }

    #[test]
    fn permissive_mode_flags_and_keeps_data() {
        let mut gate = ValidationGate::new(ValidationMode::Permissive);
        let migrated = json!({"cargo": {"crew": [{"quantity": 2}]}});
        let admitted = gate
            .admit(vehicle("v1"), migrated.clone(), Err(missing_name()))
            .unwrap();
        assert!(admitted.invalid);
        assert_eq!(admitted.system, migrated);
        assert_eq!(gate.invalid_documents().len(), 1);
    }

    #[test]
    fn a_bad_document_does_not_stop_the_batch() {
        let mut gate = ValidationGate::new(ValidationMode::Permissive);
        let _ = gate.admit(vehicle("bad"), json!({}), Err(missing_name()));
        let good = gate
            .admit(vehicle("good"), json!({}), Ok(json!({"quantity": 1})))
            .unwrap();
        assert!(!good.invalid);
        assert_eq!(good.system, json!({"quantity": 1}));
        assert!(!gate.invalid_documents().contains(&vehicle("good")));
    }

    #[test]
    fn strict_gate_downgrades_once() {
        let mut gate = ValidationGate::new(ValidationMode::Strict);
        let _ = gate.admit(vehicle("bad"), json!({}), Err(missing_name()));
        let downgrade = gate.review().unwrap();
        assert_eq!(downgrade.invalid, 1);
        assert_eq!(gate.mode(), ValidationMode::Permissive);
        assert!(gate.review().is_none());
    }

    #[test]
    fn clean_or_permissive_batches_never_downgrade() {
        let mut strict = ValidationGate::new(ValidationMode::Strict);
        assert!(strict.review().is_none());

        let mut permissive = ValidationGate::new(ValidationMode::Permissive);
        let _ = permissive.admit(vehicle("bad"), json!({}), Err(missing_name()));
        assert!(permissive.review().is_none());
    }

    #[test]
    fn embedded_and_world_items_with_one_id_are_indexed_apart() {
        let mut gate = ValidationGate::new(ValidationMode::Strict);
        let world_item = DocumentRef::new(DocumentKind::Item, "item1");
        let embedded = DocumentRef::new(DocumentKind::Item, "item1").embedded_in("npc1");
        let _ = gate.admit(world_item.clone(), json!({}), Err(missing_name()));
        let _ = gate.admit(embedded.clone(), json!({}), Err(missing_name()));

        assert_eq!(gate.invalid_documents().len(), 2);
        assert!(gate.invalid_documents().contains(&embedded));
        assert_eq!(gate.review().unwrap().invalid, 2);
        assert_eq!(embedded.to_string(), "Item npc1/item1");
    }
}

//! Typed registry of subtype schemas, resolved once at startup.

use std::collections::HashMap;

use serde_json::Value;

use super::construct::construct;
use super::field::SchemaFields;
use super::template::{compose, Template};
use super::violation::{FieldPath, SchemaViolation};
use crate::document::{DocumentKind, Subtype};
use crate::error::DomainError;
use crate::migration::{Migrated, MigrationPlan, MigrationRule};

/// The full field tree and migration plan of one subtype. Immutable once built.
#[derive(Debug, Clone)]
pub struct SubtypeSchema {
    subtype: Subtype,
    fields: SchemaFields,
    plan: MigrationPlan,
}

impl SubtypeSchema {
    /// Compose templates and own fields, and gather the migration rules of both.
    ///
    /// Own rules are registered ahead of template rules; passes still order them.
    pub fn compose(
        subtype: Subtype,
        templates: &[Template],
        own: SchemaFields,
        own_rules: &[MigrationRule],
    ) -> Result<Self, DomainError> {
        let fields = compose(&subtype.to_string(), templates, own)?;
        let rules = own_rules
            .iter()
            .copied()
            .chain(templates.iter().flat_map(|t| t.rules().iter().copied()));
        Ok(Self {
            subtype,
            fields,
            plan: MigrationPlan::new(rules),
        })
    }

    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    pub fn fields(&self) -> &SchemaFields {
        &self.fields
    }

    pub fn plan(&self) -> &MigrationPlan {
        &self.plan
    }

    /// Bring a persisted `system` tree up to the current shape. Never fails.
    pub fn migrate(&self, source: &Value) -> Migrated {
        self.plan.apply(source)
    }
}

/// Every registered subtype schema, keyed by subtype.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<Subtype, SubtypeSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every built-in subtype.
    ///
    /// Fails on the first template collision or on a schema whose own defaults
    /// do not construct; both must abort startup.
    pub fn with_builtin() -> Result<Self, DomainError> {
        let mut registry = Self::new();
        for subtype in Subtype::all() {
            registry.register(crate::subtypes::define_schema(*subtype)?)?;
        }
        Ok(registry)
    }

    /// Register one schema after checking that its defaults are valid.
    pub fn register(&mut self, schema: SubtypeSchema) -> Result<(), DomainError> {
        let name = schema.subtype().to_string();
        if self.schemas.contains_key(&schema.subtype()) {
            return Err(DomainError::registration_conflict(
                name, "*", "registered", "duplicate",
            ));
        }
        construct(schema.fields(), &Value::Null).map_err(|violation| {
            DomainError::InvalidDefault {
                schema: name,
                violation,
            }
        })?;
        self.schemas.insert(schema.subtype(), schema);
        Ok(())
    }

    pub fn schema(&self, subtype: Subtype) -> Result<&SubtypeSchema, DomainError> {
        self.schemas
            .get(&subtype)
            .ok_or_else(|| DomainError::unknown_subtype(subtype.kind().as_str(), subtype.type_name()))
    }

    /// Resolve the schema for a stored `type` string.
    pub fn resolve(&self, kind: DocumentKind, type_name: &str) -> Result<&SubtypeSchema, DomainError> {
        self.schema(kind.subtype(type_name)?)
    }

    /// The field tree of a subtype.
    pub fn define_schema(&self, subtype: Subtype) -> Result<&SchemaFields, DomainError> {
        self.schema(subtype).map(SubtypeSchema::fields)
    }

    pub fn migrate(
        &self,
        subtype: Subtype,
        source: &Value,
    ) -> Result<Migrated, DomainError> {
        Ok(self.schema(subtype)?.migrate(source))
    }

    /// Construct a document tree, including the configuration of every
    /// embedded advancement entry.
    pub fn construct(&self, schema: &SubtypeSchema, source: &Value) -> Result<Value, SchemaViolation> {
        let mut tree = construct(schema.fields(), source)?;
        if let Some(Value::Array(entries)) = tree.get_mut("advancement") {
            for (index, entry) in entries.iter_mut().enumerate() {
                self.construct_advancement(entry, index)?;
            }
        }
        Ok(tree)
    }

    fn construct_advancement(&self, entry: &mut Value, index: usize) -> Result<(), SchemaViolation> {
        let Some(entry) = entry.as_object_mut() else {
            return Ok(());
        };
        let Some(schema) = entry
            .get("type")
            .and_then(Value::as_str)
            .and_then(|name| self.resolve(DocumentKind::Advancement, name).ok())
        else {
            return Ok(());
        };
        let parent = FieldPath::root()
            .child("advancement")
            .index(index)
            .child("configuration");
        let configuration = entry.get("configuration").cloned().unwrap_or(Value::Null);
        let constructed =
            construct(schema.fields(), &configuration).map_err(|v| v.within(&parent))?;
        entry.insert("configuration".into(), constructed);
        Ok(())
    }

    pub fn subtypes(&self) -> impl Iterator<Item = Subtype> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

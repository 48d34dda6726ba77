//! Reusable partial schemas and their composition.

use std::collections::BTreeMap;

use super::field::SchemaFields;
use crate::error::DomainError;
use crate::migration::MigrationRule;

/// A named field set shared by several subtypes, together with the migration
/// rules that keep its fields current.
#[derive(Debug, Clone)]
pub struct Template {
    name: &'static str,
    fields: SchemaFields,
    rules: Vec<MigrationRule>,
}

impl Template {
    pub fn new(name: &'static str, fields: impl Into<SchemaFields>) -> Self {
        Self {
            name,
            fields: fields.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = MigrationRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &SchemaFields {
        &self.fields
    }

    pub fn rules(&self) -> &[MigrationRule] {
        &self.rules
    }
}

/// Merge templates (in the order given) and then `own` fields into one field map.
///
/// A name declared by two templates is a [`DomainError::RegistrationConflict`];
/// a name declared by a template and again in `own` is a deliberate override.
pub fn compose(
    schema: &str,
    templates: &[Template],
    own: SchemaFields,
) -> Result<SchemaFields, DomainError> {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    let mut merged = SchemaFields::new();

    for template in templates {
        for (name, field) in template.fields().iter() {
            if let Some(first) = owners.insert(name, template.name()) {
                return Err(DomainError::registration_conflict(
                    schema,
                    name,
                    first,
                    template.name(),
                ));
            }
            merged.insert(name, field.clone());
        }
    }

    merged.extend(own);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;

    fn physical() -> Template {
        Template::new(
            "physical",
            [
                ("quantity", FieldDescriptor::number().initial(1)),
                ("weight", FieldDescriptor::number().initial(0)),
            ],
        )
    }

    fn equippable() -> Template {
        Template::new("equippable", [("equipped", FieldDescriptor::boolean())])
    }

    #[test]
    fn templates_merge_in_order_with_own_fields_last() {
        let fields = compose(
            "Item.loot",
            &[physical(), equippable()],
            SchemaFields::from([("notes", FieldDescriptor::string())]),
        )
        .unwrap();
        let names: Vec<_> = fields.names().collect();
        assert_eq!(names, vec!["equipped", "notes", "quantity", "weight"]);
    }

    #[test]
    fn own_fields_override_template_fields() {
        let fields = compose(
            "Item.loot",
            &[physical()],
            SchemaFields::from([("quantity", FieldDescriptor::number().initial(5))]),
        )
        .unwrap();
        assert_eq!(
            fields.get("quantity").and_then(|f| f.initial.clone()),
            Some(serde_json::json!(5))
        );
    }

    #[test]
    fn collision_between_templates_is_a_registration_conflict() {
        let clash = Template::new("heavy", [("weight", FieldDescriptor::number().initial(10))]);
        let err = compose("Item.loot", &[physical(), clash], SchemaFields::new()).unwrap_err();
        assert_eq!(
            err,
            DomainError::registration_conflict("Item.loot", "weight", "physical", "heavy")
        );
    }
}

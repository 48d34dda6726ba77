//! Journal entry page subtypes.

use crate::document::Subtype;
use crate::error::DomainError;
use crate::schema::{FieldDescriptor, SchemaFields, SubtypeSchema};

/// Class summary page.
pub fn class_page() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::ClassPage,
        &[],
        SchemaFields::from([
            ("item", FieldDescriptor::string().required().label("Class Item")),
            (
                "description",
                FieldDescriptor::object([
                    ("value", FieldDescriptor::html()),
                    ("additionalHitPoints", FieldDescriptor::html()),
                    ("additionalTraits", FieldDescriptor::html()),
                    ("additionalEquipment", FieldDescriptor::html()),
                    ("subclass", FieldDescriptor::html()),
                ]),
            ),
            ("subclassHeader", FieldDescriptor::string()),
            (
                "subclassItems",
                FieldDescriptor::set(FieldDescriptor::string()).label("Subclass Items"),
            ),
        ]),
        &[],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::construct;
    use serde_json::json;

    #[test]
    fn subclass_items_are_deduplicated() {
        let page = class_page().unwrap();
        let doc = construct(
            page.fields(),
            &json!({"item": "Compendium.mojo.classes.Item.abc", "subclassItems": ["a", "b", "a"]}),
        )
        .unwrap();
        assert_eq!(doc["subclassItems"], json!(["a", "b"]));
        assert_eq!(doc["description"]["value"], json!(""));
    }
}

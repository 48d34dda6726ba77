//! Advancement configuration schemas.
//!
//! These are not stored as documents of their own: they describe the
//! `configuration` object of each entry in an item's `advancement` list.

use serde_json::Value;

use crate::document::Subtype;
use crate::error::DomainError;
use crate::schema::{FieldDescriptor, SchemaFields, SubtypeSchema};

/// Hit point advancement has nothing to configure.
pub fn hit_points() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(Subtype::HitPoints, &[], SchemaFields::new(), &[])
}

/// Changes applied to spells granted by an advancement.
fn spell_configuration() -> FieldDescriptor {
    FieldDescriptor::object([
        ("ability", FieldDescriptor::string()),
        ("preparation", FieldDescriptor::string()),
        (
            "uses",
            FieldDescriptor::object([
                ("max", FieldDescriptor::deterministic_formula()),
                ("per", FieldDescriptor::string()),
            ]),
        ),
    ])
}

pub fn item_grant() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::ItemGrant,
        &[],
        SchemaFields::from([
            (
                "items",
                FieldDescriptor::array(FieldDescriptor::string()).required(),
            ),
            ("optional", FieldDescriptor::boolean().required()),
            (
                "spell",
                spell_configuration()
                    .required()
                    .nullable()
                    .initial(Value::Null),
            ),
        ]),
        &[],
    )
}

pub fn scale_value() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::ScaleValue,
        &[],
        SchemaFields::from([
            ("identifier", FieldDescriptor::string().required()),
            (
                "type",
                FieldDescriptor::string()
                    .required()
                    .not_blank()
                    .choices(["string", "number", "cr", "dice", "distance"])
                    .initial("string"),
            ),
            (
                "distance",
                FieldDescriptor::object([("units", FieldDescriptor::string())]),
            ),
            // Keyed by level; value shape depends on `type`.
            ("scale", FieldDescriptor::mapping(FieldDescriptor::any())),
        ]),
        &[],
    )
}

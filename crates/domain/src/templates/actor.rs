//! Actor field sets.
//!
//! `common` and `creature` are composed at the top level; the `*_attributes`,
//! `*_details` and `*_traits` helpers return the shared contents of the nested
//! objects, which each actor subtype extends with its own fields.

use crate::config::{keys, Ability, ActorSize, Currency};
use crate::migration::rules::attributes;
use crate::schema::{FieldDescriptor, SchemaFields, Template};

/// Abilities shared by characters, NPCs and vehicles, plus the initiative rules
/// that keep their attributes current.
pub fn common() -> Template {
    let ability = FieldDescriptor::object([
        (
            "value",
            FieldDescriptor::number()
                .required()
                .integer()
                .min(0.0)
                .initial(10),
        ),
        (
            "proficient",
            FieldDescriptor::number().required().min(0.0).max(1.0).initial(0),
        ),
        (
            "bonuses",
            FieldDescriptor::object([
                ("check", FieldDescriptor::formula().required()),
                ("save", FieldDescriptor::formula().required()),
            ]),
        ),
    ]);
    Template::new(
        "actor-common",
        [(
            "abilities",
            FieldDescriptor::mapping(ability)
                .initial_keys(keys(Ability::all(), Ability::key))
                .label("Abilities"),
        )],
    )
    .with_rules(attributes::RULES.iter().copied())
}

/// Global roll bonuses shared by characters and NPCs.
pub fn creature() -> Template {
    let formulas = |names: &[&str]| -> SchemaFields {
        names
            .iter()
            .map(|name| (*name, FieldDescriptor::formula().required()))
            .collect()
    };
    Template::new(
        "creature",
        [(
            "bonuses",
            FieldDescriptor::object([
                ("mwak", FieldDescriptor::object(formulas(&["attack", "damage"]))),
                ("rwak", FieldDescriptor::object(formulas(&["attack", "damage"]))),
                ("msak", FieldDescriptor::object(formulas(&["attack", "damage"]))),
                ("rsak", FieldDescriptor::object(formulas(&["attack", "damage"]))),
                (
                    "abilities",
                    FieldDescriptor::object(formulas(&["check", "save", "skill"])),
                ),
                ("spell", FieldDescriptor::object(formulas(&["dc"]))),
            ])
            .label("Bonuses"),
        )],
    )
}

fn movement_speed(initial: i64) -> FieldDescriptor {
    FieldDescriptor::number()
        .integer()
        .min(0.0)
        .initial(initial)
}

/// Attribute fields shared by characters, NPCs and vehicles.
pub fn common_attributes() -> SchemaFields {
    SchemaFields::from([
        (
            "init",
            FieldDescriptor::object([
                ("ability", FieldDescriptor::string()),
                ("bonus", FieldDescriptor::formula()),
            ])
            .label("Initiative"),
        ),
        (
            "movement",
            FieldDescriptor::object([
                ("burrow", movement_speed(0)),
                ("climb", movement_speed(0)),
                ("fly", movement_speed(0)),
                ("swim", movement_speed(0)),
                ("walk", movement_speed(30)),
                ("units", FieldDescriptor::string().initial("ft")),
                ("hover", FieldDescriptor::boolean()),
            ])
            .label("Movement"),
        ),
    ])
}

/// Attribute fields shared by characters and NPCs.
pub fn creature_attributes() -> SchemaFields {
    let sense = || {
        FieldDescriptor::number()
            .required()
            .integer()
            .min(0.0)
            .initial(0)
    };
    SchemaFields::from([
        (
            "attunement",
            FieldDescriptor::object([(
                "max",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(3),
            )])
            .label("Attunement"),
        ),
        (
            "senses",
            FieldDescriptor::object([
                ("darkvision", sense()),
                ("blindsight", sense()),
                ("tremorsense", sense()),
                ("truesight", sense()),
                ("units", FieldDescriptor::string().required().initial("ft")),
                ("special", FieldDescriptor::string().required()),
            ])
            .label("Senses"),
        ),
        (
            "spellcasting",
            FieldDescriptor::string()
                .required()
                .initial(Ability::Int.key())
                .label("Spellcasting Ability"),
        ),
    ])
}

/// Detail fields shared by every actor that keeps a biography.
pub fn common_details() -> SchemaFields {
    SchemaFields::from([(
        "biography",
        FieldDescriptor::object([
            ("value", FieldDescriptor::html()),
            ("public", FieldDescriptor::html()),
        ])
        .label("Biography"),
    )])
}

/// A trait with a set of keys and a freeform addition.
pub fn simple_trait(initial: &[&str]) -> FieldDescriptor {
    let values: Vec<serde_json::Value> = initial.iter().map(|v| (*v).into()).collect();
    FieldDescriptor::object([
        (
            "value",
            FieldDescriptor::set(FieldDescriptor::string()).initial(values),
        ),
        ("custom", FieldDescriptor::string().required()),
    ])
}

/// A damage trait, which can also be bypassed by certain weapon properties.
pub fn damage_trait(initial: &[&str]) -> FieldDescriptor {
    let values: Vec<serde_json::Value> = initial.iter().map(|v| (*v).into()).collect();
    FieldDescriptor::object([
        (
            "value",
            FieldDescriptor::set(FieldDescriptor::string()).initial(values),
        ),
        ("bypasses", FieldDescriptor::set(FieldDescriptor::string())),
        ("custom", FieldDescriptor::string().required()),
    ])
}

/// Trait fields shared by every actor with a body.
pub fn common_traits() -> SchemaFields {
    SchemaFields::from([
        (
            "size",
            FieldDescriptor::string()
                .required()
                .not_blank()
                .choices(keys(ActorSize::all(), ActorSize::key))
                .initial(ActorSize::default().key()),
        ),
        ("di", damage_trait(&[])),
        ("dr", damage_trait(&[])),
        ("dv", damage_trait(&[])),
        ("ci", simple_trait(&[])),
    ])
}

/// Trait fields of creatures, which also speak.
pub fn creature_traits() -> SchemaFields {
    let mut fields = common_traits();
    fields.insert("languages", simple_trait(&[]));
    fields
}

/// Coin purse keyed by denomination.
pub fn currency() -> FieldDescriptor {
    let coins: SchemaFields = Currency::all()
        .iter()
        .map(|coin| {
            (
                coin.key(),
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(0),
            )
        })
        .collect();
    FieldDescriptor::object(coins).label("Currency")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::construct;
    use serde_json::json;

    #[test]
    fn abilities_start_with_every_key() {
        let doc = construct(common().fields(), &json!({})).unwrap();
        let abilities = doc["abilities"].as_object().unwrap();
        assert_eq!(abilities.len(), Ability::all().len());
        assert_eq!(doc["abilities"]["str"]["value"], json!(10));
    }

    #[test]
    fn legacy_init_value_is_dropped_by_construction() {
        let fields = SchemaFields::from([("attributes", FieldDescriptor::object(common_attributes()))]);
        let doc = construct(&fields, &json!({"attributes": {"init": {"value": 2, "bonus": "2"}}})).unwrap();
        assert_eq!(doc["attributes"]["init"], json!({"ability": "", "bonus": "2"}));
        assert_eq!(doc["attributes"]["movement"]["walk"], json!(30));
    }

    #[test]
    fn damage_traits_dedupe_values() {
        let fields = SchemaFields::from([("di", damage_trait(&["poison"]))]);
        let doc = construct(&fields, &json!({"di": {"value": ["fire", "fire"]}})).unwrap();
        assert_eq!(doc["di"]["value"], json!(["fire"]));
        let doc = construct(&fields, &json!({})).unwrap();
        assert_eq!(doc["di"]["value"], json!(["poison"]));
    }

    #[test]
    fn currency_has_every_denomination() {
        let fields = SchemaFields::from([("currency", currency())]);
        let doc = construct(&fields, &json!({})).unwrap();
        assert_eq!(doc["currency"], json!({"pp": 0, "gp": 0, "ep": 0, "sp": 0, "cp": 0}));
    }
}

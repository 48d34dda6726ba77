//! Item templates: description, physical, equippable, activated effect, action
//! and mountable.

use serde_json::Value;

use crate::config::{keys, AttunementType, Currency, ItemRarity};
use crate::migration::rules::{activated_effect, equippable, physical_item};
use crate::schema::{FieldDescriptor, SchemaFields, Template};

pub fn description() -> Template {
    Template::new(
        "item-description",
        [
            (
                "description",
                FieldDescriptor::object([
                    ("value", FieldDescriptor::html().required().nullable()),
                    ("chat", FieldDescriptor::html().required().nullable()),
                    ("unidentified", FieldDescriptor::html().required().nullable()),
                ])
                .label("Description"),
            ),
            ("source", FieldDescriptor::string().required().label("Source")),
        ],
    )
}

pub fn physical() -> Template {
    Template::new(
        "physical-item",
        [
            (
                "quantity",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(1)
                    .label("Quantity"),
            ),
            (
                "weight",
                FieldDescriptor::number()
                    .required()
                    .min(0.0)
                    .initial(0)
                    .label("Weight"),
            ),
            (
                "price",
                FieldDescriptor::object([
                    (
                        "value",
                        FieldDescriptor::number().required().min(0.0).initial(0),
                    ),
                    (
                        "denomination",
                        FieldDescriptor::string()
                            .required()
                            .not_blank()
                            .choices(keys(Currency::all(), Currency::key))
                            .initial(Currency::DEFAULT.key()),
                    ),
                ])
                .label("Price"),
            ),
            (
                "rarity",
                FieldDescriptor::string()
                    .required()
                    .choices(keys(ItemRarity::all(), ItemRarity::key))
                    .label("Rarity"),
            ),
            (
                "identified",
                FieldDescriptor::boolean()
                    .required()
                    .initial(true)
                    .label("Identified"),
            ),
        ],
    )
    .with_rules(physical_item::RULES.iter().copied())
}

pub fn equippable() -> Template {
    Template::new(
        "equippable-item",
        [
            (
                "attunement",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(AttunementType::None.code() as f64)
                    .max(AttunementType::Attuned.code() as f64)
                    .initial(AttunementType::None.code())
                    .label("Attunement"),
            ),
            (
                "equipped",
                FieldDescriptor::boolean().required().label("Equipped"),
            ),
        ],
    )
    .with_rules(equippable::RULES.iter().copied())
}

/// Fields of a limited-uses block; consumables extend it.
pub fn uses_fields() -> SchemaFields {
    SchemaFields::from([
        (
            "value",
            FieldDescriptor::number()
                .required()
                .nullable()
                .integer()
                .min(0.0)
                .label("Available"),
        ),
        (
            "max",
            FieldDescriptor::deterministic_formula()
                .required()
                .label("Max"),
        ),
        (
            "per",
            FieldDescriptor::string()
                .required()
                .nullable()
                .initial(Value::Null)
                .label("Per"),
        ),
        ("recovery", FieldDescriptor::formula().required().label("Recovery")),
    ])
}

pub fn activated_effect() -> Template {
    let distance = || FieldDescriptor::number().required().nullable().min(0.0);
    Template::new(
        "activated-effect",
        [
            (
                "activation",
                FieldDescriptor::object([
                    ("type", FieldDescriptor::string().required()),
                    ("cost", FieldDescriptor::number().required().nullable()),
                    ("condition", FieldDescriptor::string().required()),
                ])
                .label("Activation"),
            ),
            (
                "duration",
                FieldDescriptor::object([
                    ("value", FieldDescriptor::deterministic_formula().required()),
                    ("units", FieldDescriptor::string().required()),
                ])
                .label("Duration"),
            ),
            (
                "target",
                FieldDescriptor::object([
                    ("value", distance()),
                    ("width", distance()),
                    ("units", FieldDescriptor::string().required()),
                    ("type", FieldDescriptor::string().required()),
                ])
                .label("Target"),
            ),
            (
                "range",
                FieldDescriptor::object([
                    ("value", distance()),
                    ("long", distance()),
                    ("units", FieldDescriptor::string().required()),
                ])
                .label("Range"),
            ),
            ("uses", FieldDescriptor::object(uses_fields()).label("Limited Uses")),
            (
                "consume",
                FieldDescriptor::object([
                    ("type", FieldDescriptor::string().required()),
                    (
                        "target",
                        FieldDescriptor::string()
                            .required()
                            .nullable()
                            .initial(Value::Null),
                    ),
                    (
                        "amount",
                        FieldDescriptor::number().required().nullable().integer(),
                    ),
                ])
                .label("Consume"),
            ),
        ],
    )
    .with_rules(activated_effect::RULES.iter().copied())
}

pub fn action() -> Template {
    Template::new(
        "action",
        [
            (
                "ability",
                FieldDescriptor::string()
                    .required()
                    .nullable()
                    .initial(Value::Null)
                    .label("Ability"),
            ),
            (
                "actionType",
                FieldDescriptor::string()
                    .required()
                    .nullable()
                    .initial(Value::Null)
                    .label("Action Type"),
            ),
            ("attackBonus", FieldDescriptor::formula().required()),
            ("chatFlavor", FieldDescriptor::string().required()),
            (
                "critical",
                FieldDescriptor::object([
                    (
                        "threshold",
                        FieldDescriptor::number()
                            .required()
                            .nullable()
                            .integer()
                            .min(1.0),
                    ),
                    ("damage", FieldDescriptor::formula().required()),
                ]),
            ),
            (
                "damage",
                FieldDescriptor::object([
                    (
                        "parts",
                        FieldDescriptor::array(FieldDescriptor::array(FieldDescriptor::string())),
                    ),
                    ("versatile", FieldDescriptor::formula().required()),
                ]),
            ),
            ("formula", FieldDescriptor::formula().required()),
            (
                "save",
                FieldDescriptor::object([
                    ("ability", FieldDescriptor::string().required()),
                    (
                        "dc",
                        FieldDescriptor::number()
                            .required()
                            .nullable()
                            .integer()
                            .min(0.0),
                    ),
                    (
                        "scaling",
                        FieldDescriptor::string().required().not_blank().initial("spell"),
                    ),
                ]),
            ),
        ],
    )
}

pub fn mountable() -> Template {
    let points = || FieldDescriptor::number().required().nullable().integer().min(0.0);
    Template::new(
        "mountable",
        [
            (
                "armor",
                FieldDescriptor::object([("value", points())]).label("Armor Class"),
            ),
            (
                "hp",
                FieldDescriptor::object([
                    ("value", points()),
                    ("max", points()),
                    ("dt", points()),
                    ("conditions", FieldDescriptor::string().required()),
                ])
                .label("Hit Points"),
            ),
        ],
    )
}

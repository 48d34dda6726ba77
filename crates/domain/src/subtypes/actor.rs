//! Actor subtypes.

use serde_json::Value;

use crate::document::Subtype;
use crate::error::DomainError;
use crate::schema::{FieldDescriptor, SchemaFields, SubtypeSchema};
use crate::templates::actor::{
    common, common_attributes, common_details, common_traits, creature, creature_attributes,
    creature_traits, currency, damage_trait, simple_trait,
};

fn hit_points(extra: SchemaFields) -> FieldDescriptor {
    let mut fields = SchemaFields::from([
        (
            "value",
            FieldDescriptor::number()
                .nullable()
                .integer()
                .min(0.0)
                .initial(Value::Null),
        ),
        (
            "max",
            FieldDescriptor::number()
                .nullable()
                .integer()
                .min(0.0)
                .initial(Value::Null),
        ),
        (
            "temp",
            FieldDescriptor::number()
                .nullable()
                .integer()
                .min(0.0)
                .initial(0),
        ),
        (
            "tempmax",
            FieldDescriptor::number().nullable().integer().initial(0),
        ),
    ]);
    fields.extend(extra);
    FieldDescriptor::object(fields).label("Hit Points")
}

fn armor_class_fields() -> SchemaFields {
    SchemaFields::from([
        (
            "flat",
            FieldDescriptor::number().nullable().integer().min(0.0),
        ),
        ("calc", FieldDescriptor::string().initial("default")),
        ("formula", FieldDescriptor::deterministic_formula()),
    ])
}

fn armor_class() -> FieldDescriptor {
    FieldDescriptor::object(armor_class_fields()).label("Armor Class")
}

fn nested(base: SchemaFields, extra: impl Into<SchemaFields>) -> FieldDescriptor {
    let mut fields = base;
    fields.extend(extra.into());
    FieldDescriptor::object(fields)
}

pub fn character() -> Result<SubtypeSchema, DomainError> {
    let mut attributes = common_attributes();
    attributes.extend(creature_attributes());
    let attributes = nested(
        attributes,
        [
            ("ac", armor_class()),
            ("hp", hit_points(SchemaFields::new())),
            (
                "death",
                FieldDescriptor::object([
                    (
                        "success",
                        FieldDescriptor::number()
                            .required()
                            .integer()
                            .min(0.0)
                            .initial(0),
                    ),
                    (
                        "failure",
                        FieldDescriptor::number()
                            .required()
                            .integer()
                            .min(0.0)
                            .initial(0),
                    ),
                ]),
            ),
            (
                "exhaustion",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(0),
            ),
            ("inspiration", FieldDescriptor::boolean().required()),
        ],
    );

    let details = nested(
        common_details(),
        [
            ("alignment", FieldDescriptor::string().required()),
            ("race", FieldDescriptor::string().required()),
            ("background", FieldDescriptor::string().required()),
            ("originalClass", FieldDescriptor::string().required()),
            (
                "xp",
                FieldDescriptor::object([(
                    "value",
                    FieldDescriptor::number()
                        .required()
                        .integer()
                        .min(0.0)
                        .initial(0),
                )]),
            ),
            ("appearance", FieldDescriptor::string().required()),
            ("trait", FieldDescriptor::string().required()),
            ("ideal", FieldDescriptor::string().required()),
            ("bond", FieldDescriptor::string().required()),
            ("flaw", FieldDescriptor::string().required()),
        ],
    );

    SubtypeSchema::compose(
        Subtype::Character,
        &[common(), creature()],
        SchemaFields::from([
            ("attributes", attributes.label("Attributes")),
            ("details", details.label("Details")),
            (
                "traits",
                nested(
                    creature_traits(),
                    [
                        ("weaponProf", simple_trait(&[])),
                        ("armorProf", simple_trait(&[])),
                    ],
                )
                .label("Traits"),
            ),
            ("currency", currency()),
        ]),
        &[],
    )
}

pub fn npc() -> Result<SubtypeSchema, DomainError> {
    let mut attributes = common_attributes();
    attributes.extend(creature_attributes());
    let attributes = nested(
        attributes,
        [
            ("ac", armor_class()),
            (
                "hp",
                hit_points(SchemaFields::from([(
                    "formula",
                    FieldDescriptor::formula().required(),
                )])),
            ),
        ],
    );

    let details = nested(
        common_details(),
        [
            ("alignment", FieldDescriptor::string().required()),
            (
                "type",
                FieldDescriptor::object([
                    ("value", FieldDescriptor::string().required()),
                    ("subtype", FieldDescriptor::string().required()),
                    ("swarm", FieldDescriptor::string().required()),
                    ("custom", FieldDescriptor::string().required()),
                ]),
            ),
            ("environment", FieldDescriptor::string().required()),
            (
                "cr",
                FieldDescriptor::number()
                    .required()
                    .nullable()
                    .min(0.0)
                    .initial(1),
            ),
            (
                "spellLevel",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(0),
            ),
            ("source", FieldDescriptor::string().required()),
        ],
    );

    let pool = || {
        FieldDescriptor::object([
            (
                "value",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(0),
            ),
            (
                "max",
                FieldDescriptor::number()
                    .required()
                    .integer()
                    .min(0.0)
                    .initial(0),
            ),
        ])
    };

    SubtypeSchema::compose(
        Subtype::Npc,
        &[common(), creature()],
        SchemaFields::from([
            ("attributes", attributes.label("Attributes")),
            ("details", details.label("Details")),
            (
                "resources",
                FieldDescriptor::object([
                    ("legact", pool()),
                    ("legres", pool()),
                    (
                        "lair",
                        FieldDescriptor::object([
                            ("value", FieldDescriptor::boolean().required()),
                            (
                                "initiative",
                                FieldDescriptor::number().required().nullable().integer(),
                            ),
                        ]),
                    ),
                ])
                .label("Resources"),
            ),
            ("traits", FieldDescriptor::object(creature_traits()).label("Traits")),
        ]),
        &[],
    )
}

/// Crew and passenger entries must name who is aboard.
fn passenger() -> FieldDescriptor {
    FieldDescriptor::object([
        (
            "name",
            FieldDescriptor::string()
                .required()
                .not_blank()
                .label("Name"),
        ),
        (
            "quantity",
            FieldDescriptor::number()
                .required()
                .integer()
                .min(0.0)
                .initial(0)
                .label("Quantity"),
        ),
    ])
}

pub fn vehicle() -> Result<SubtypeSchema, DomainError> {
    let threshold = || FieldDescriptor::number().required().nullable().integer().min(0.0);
    let attributes = nested(
        common_attributes(),
        [
            (
                "ac",
                nested(
                    armor_class_fields(),
                    [("motionless", FieldDescriptor::string().required())],
                )
                .label("Armor Class"),
            ),
            (
                "hp",
                hit_points(SchemaFields::from([
                    ("dt", threshold()),
                    ("mt", threshold()),
                ])),
            ),
            (
                "actions",
                FieldDescriptor::object([
                    ("stations", FieldDescriptor::boolean().required()),
                    (
                        "value",
                        FieldDescriptor::number()
                            .required()
                            .integer()
                            .min(0.0)
                            .initial(0),
                    ),
                    (
                        "thresholds",
                        FieldDescriptor::object([
                            ("2", threshold()),
                            ("1", threshold()),
                            ("0", threshold()),
                        ]),
                    ),
                ]),
            ),
            (
                "capacity",
                FieldDescriptor::object([
                    ("creature", FieldDescriptor::string().required()),
                    (
                        "cargo",
                        FieldDescriptor::number()
                            .required()
                            .integer()
                            .min(0.0)
                            .initial(0),
                    ),
                ]),
            ),
        ],
    );

    let mut traits = common_traits();
    traits.extend(SchemaFields::from([
        (
            "size",
            FieldDescriptor::string().required().not_blank().initial("lg"),
        ),
        ("di", damage_trait(&["poison", "psychic"])),
        (
            "ci",
            simple_trait(&[
                "blinded",
                "charmed",
                "deafened",
                "frightened",
                "paralyzed",
                "petrified",
                "poisoned",
                "stunned",
                "unconscious",
            ]),
        ),
        ("dimensions", FieldDescriptor::string().required()),
    ]));

    SubtypeSchema::compose(
        Subtype::Vehicle,
        &[common()],
        SchemaFields::from([
            (
                "vehicleType",
                FieldDescriptor::string().required().initial("water"),
            ),
            ("attributes", attributes.label("Attributes")),
            ("details", FieldDescriptor::object(common_details()).label("Details")),
            ("traits", FieldDescriptor::object(traits).label("Traits")),
            (
                "cargo",
                FieldDescriptor::object([
                    ("crew", FieldDescriptor::array(passenger())),
                    ("passengers", FieldDescriptor::array(passenger())),
                ])
                .label("Crew & Passengers"),
            ),
        ]),
        &[],
    )
}

pub fn group() -> Result<SubtypeSchema, DomainError> {
    let pace = || FieldDescriptor::number().nullable().integer().min(0.0).initial(0);
    SubtypeSchema::compose(
        Subtype::Group,
        &[],
        SchemaFields::from([
            (
                "description",
                FieldDescriptor::object([
                    ("full", FieldDescriptor::html()),
                    ("summary", FieldDescriptor::html()),
                ]),
            ),
            ("members", FieldDescriptor::set(FieldDescriptor::string())),
            (
                "attributes",
                FieldDescriptor::object([(
                    "movement",
                    FieldDescriptor::object([
                        ("land", pace()),
                        ("water", pace()),
                        ("air", pace()),
                    ]),
                )]),
            ),
            ("currency", currency()),
        ]),
        &[],
    )
}

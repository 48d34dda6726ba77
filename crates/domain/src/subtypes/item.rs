//! Item subtypes.

use crate::config::{keys, Ability, WeaponType, WEAPON_PROPERTIES};
use crate::document::Subtype;
use crate::error::DomainError;
use crate::migration::rules::{tool as tool_rules, weapon as weapon_rules};
use crate::schema::{FieldDescriptor, SchemaFields, SubtypeSchema};
use crate::templates::item::{
    action, activated_effect, description, equippable, mountable, physical, uses_fields,
};

pub fn weapon() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::Weapon,
        &[
            description(),
            physical(),
            equippable(),
            activated_effect(),
            action(),
            mountable(),
        ],
        SchemaFields::from([
            (
                "weaponType",
                FieldDescriptor::string()
                    .required()
                    .initial(WeaponType::DEFAULT.key())
                    .label("Weapon Type"),
            ),
            ("baseItem", FieldDescriptor::string().required()),
            (
                "properties",
                FieldDescriptor::mapping(FieldDescriptor::boolean())
                    .required()
                    .initial_keys(WEAPON_PROPERTIES.iter().copied())
                    .label("Weapon Properties"),
            ),
            (
                "proficient",
                FieldDescriptor::boolean().required().initial(true),
            ),
        ]),
        weapon_rules::RULES,
    )
}

pub fn equipment() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::Equipment,
        &[
            description(),
            physical(),
            equippable(),
            activated_effect(),
            action(),
            mountable(),
        ],
        SchemaFields::from([
            (
                "armor",
                FieldDescriptor::object([
                    ("type", FieldDescriptor::string().required().initial("light")),
                    (
                        "value",
                        FieldDescriptor::number()
                            .required()
                            .nullable()
                            .integer()
                            .min(0.0),
                    ),
                    (
                        "dex",
                        FieldDescriptor::number().required().nullable().integer(),
                    ),
                ])
                .label("Armor"),
            ),
            ("baseItem", FieldDescriptor::string().required()),
            (
                "speed",
                FieldDescriptor::object([
                    (
                        "value",
                        FieldDescriptor::number().required().nullable().min(0.0),
                    ),
                    ("conditions", FieldDescriptor::string().required()),
                ]),
            ),
            (
                "strength",
                FieldDescriptor::number()
                    .required()
                    .nullable()
                    .integer()
                    .min(0.0),
            ),
            ("stealth", FieldDescriptor::boolean().required()),
            (
                "proficient",
                FieldDescriptor::boolean().required().initial(true),
            ),
        ]),
        &[],
    )
}

pub fn consumable() -> Result<SubtypeSchema, DomainError> {
    let mut uses = uses_fields();
    uses.insert(
        "autoDestroy",
        FieldDescriptor::boolean().required().label("Destroy on Empty"),
    );
    SubtypeSchema::compose(
        Subtype::Consumable,
        &[
            description(),
            physical(),
            equippable(),
            activated_effect(),
            action(),
        ],
        SchemaFields::from([
            (
                "consumableType",
                FieldDescriptor::string().required().initial("potion"),
            ),
            ("uses", FieldDescriptor::object(uses).label("Limited Uses")),
        ]),
        &[],
    )
}

pub fn tool() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::Tool,
        &[description(), physical(), equippable()],
        SchemaFields::from([
            ("toolType", FieldDescriptor::string().required()),
            ("baseItem", FieldDescriptor::string().required()),
            (
                "ability",
                FieldDescriptor::string()
                    .required()
                    .not_blank()
                    .initial(Ability::Int.key())
                    .label("Default Ability Check"),
            ),
            ("chatFlavor", FieldDescriptor::string().required()),
            (
                "proficient",
                FieldDescriptor::number().required().min(0.0).initial(0),
            ),
            ("bonus", FieldDescriptor::formula().required()),
        ]),
        tool_rules::RULES,
    )
}

pub fn loot() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::Loot,
        &[description(), physical()],
        SchemaFields::new(),
        &[],
    )
}

pub fn subclass() -> Result<SubtypeSchema, DomainError> {
    SubtypeSchema::compose(
        Subtype::Subclass,
        &[description()],
        SchemaFields::from([
            ("identifier", FieldDescriptor::string().required()),
            ("classIdentifier", FieldDescriptor::string().required()),
            // Each entry's configuration is checked against its advancement schema.
            ("advancement", FieldDescriptor::array(FieldDescriptor::any())),
            (
                "spellcasting",
                FieldDescriptor::object([
                    (
                        "progression",
                        FieldDescriptor::string()
                            .required()
                            .not_blank()
                            .initial("none"),
                    ),
                    ("ability", FieldDescriptor::string().required()),
                ]),
            ),
        ]),
        &[],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn own_fields_override_template_fields() {
        let equipment = equipment().unwrap();
        assert!(equipment.fields().lookup("armor.type").is_some());
        let consumable = consumable().unwrap();
        assert!(consumable.fields().lookup("uses.autoDestroy").is_some());
        assert!(consumable.fields().lookup("uses.recovery").is_some());
    }

    #[test]
    fn weapon_plan_runs_template_and_own_rules() {
        let weapon = weapon().unwrap();
        let ids: Vec<_> = weapon.plan().rule_ids().collect();
        assert!(ids.contains(&"weapon.properties"));
        assert!(ids.contains(&"physical-item.price"));
        assert!(ids.contains(&"activated-effect.range-split"));
        assert!(!ids.contains(&"tool.ability"));
    }

    #[test]
    fn weapon_properties_default_to_false() {
        let weapon = weapon().unwrap();
        let doc = crate::schema::construct(weapon.fields(), &json!({})).unwrap();
        let properties = doc["properties"].as_object().unwrap();
        assert_eq!(properties.len(), WEAPON_PROPERTIES.len());
        assert!(properties.values().all(|flag| flag == &json!(false)));
    }

    #[test]
    fn legacy_weapon_migrates_and_constructs() {
        let weapon = weapon().unwrap();
        let legacy = json!({
            "price": 25,
            "rarity": "Very Rare",
            "attuned": true,
            "range": {"value": "100/400", "units": "ft"},
            "uses": {"max": 0, "value": ""},
            "properties": {"fin": true, "lgt": "yes"},
            "proficient": 1,
            "weaponType": null
        });
        let migrated = weapon.migrate(&legacy);
        let doc = crate::schema::construct(weapon.fields(), &migrated.source).unwrap();
        assert_eq!(doc["price"], json!({"value": 25, "denomination": "gp"}));
        assert_eq!(doc["rarity"], json!("veryRare"));
        assert_eq!(doc["attunement"], json!(2));
        assert_eq!(doc["range"], json!({"value": 100, "long": 400, "units": "ft"}));
        assert_eq!(doc["uses"]["max"], json!(""));
        assert_eq!(doc["properties"]["fin"], json!(true));
        assert!(doc["properties"].get("lgt").is_none());
        assert_eq!(doc["proficient"], json!(true));
        assert_eq!(doc["weaponType"], json!("simpleM"));
        assert!(doc.get("attuned").is_none());
    }

    #[test]
    fn tool_with_ability_list_constructs() {
        let tool = tool().unwrap();
        let migrated = tool.migrate(&json!({"ability": ["dex", "int"]}));
        let doc = crate::schema::construct(tool.fields(), &migrated.source).unwrap();
        assert_eq!(doc["ability"], json!("dex"));
    }
}

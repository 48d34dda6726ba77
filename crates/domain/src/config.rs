//! Typed system configuration tables.
//!
//! These replace string-keyed lookups: schemas and migration rules reference the
//! tables directly, resolved once when the registry is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Ability scores used within the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
    Hon,
    San,
}

impl Ability {
    pub fn all() -> &'static [Ability] {
        &[
            Ability::Str,
            Ability::Dex,
            Ability::Con,
            Ability::Int,
            Ability::Wis,
            Ability::Cha,
            Ability::Hon,
            Ability::San,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Ability::Str => "str",
            Ability::Dex => "dex",
            Ability::Con => "con",
            Ability::Int => "int",
            Ability::Wis => "wis",
            Ability::Cha => "cha",
            Ability::Hon => "hon",
            Ability::San => "san",
        }
    }
}

/// Item rarity tiers, keyed the way documents store them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
    Artifact,
}

impl ItemRarity {
    pub fn all() -> &'static [ItemRarity] {
        &[
            ItemRarity::Common,
            ItemRarity::Uncommon,
            ItemRarity::Rare,
            ItemRarity::VeryRare,
            ItemRarity::Legendary,
            ItemRarity::Artifact,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ItemRarity::Common => "common",
            ItemRarity::Uncommon => "uncommon",
            ItemRarity::Rare => "rare",
            ItemRarity::VeryRare => "veryRare",
            ItemRarity::Legendary => "legendary",
            ItemRarity::Artifact => "artifact",
        }
    }

    /// Display label; legacy documents stored this freeform.
    pub fn label(&self) -> &'static str {
        match self {
            ItemRarity::Common => "Common",
            ItemRarity::Uncommon => "Uncommon",
            ItemRarity::Rare => "Rare",
            ItemRarity::VeryRare => "Very Rare",
            ItemRarity::Legendary => "Legendary",
            ItemRarity::Artifact => "Artifact",
        }
    }

    /// Exact key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|rarity| rarity.key() == key)
    }

    /// Case-insensitive match against the display labels.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|rarity| rarity.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ItemRarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| DomainError::parse(format!("Unknown item rarity: '{s}'")))
    }
}

/// Three-state attunement stored as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttunementType {
    #[default]
    None,
    Required,
    Attuned,
}

impl AttunementType {
    pub fn code(&self) -> i64 {
        match self {
            AttunementType::None => 0,
            AttunementType::Required => 1,
            AttunementType::Attuned => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AttunementType::None),
            1 => Some(AttunementType::Required),
            2 => Some(AttunementType::Attuned),
            _ => None,
        }
    }
}

/// Currency denominations, most valuable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Pp,
    Gp,
    Ep,
    Sp,
    Cp,
}

impl Currency {
    pub const DEFAULT: Currency = Currency::Gp;

    pub fn all() -> &'static [Currency] {
        &[Currency::Pp, Currency::Gp, Currency::Ep, Currency::Sp, Currency::Cp]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Currency::Pp => "pp",
            Currency::Gp => "gp",
            Currency::Ep => "ep",
            Currency::Sp => "sp",
            Currency::Cp => "cp",
        }
    }

    /// Value of one coin in gold pieces.
    pub fn conversion(&self) -> f64 {
        match self {
            Currency::Pp => 10.0,
            Currency::Gp => 1.0,
            Currency::Ep => 0.5,
            Currency::Sp => 0.1,
            Currency::Cp => 0.01,
        }
    }
}

/// Weapon categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[serde(rename = "simpleM")]
    SimpleMelee,
    #[serde(rename = "simpleR")]
    SimpleRanged,
    #[serde(rename = "martialM")]
    MartialMelee,
    #[serde(rename = "martialR")]
    MartialRanged,
    #[serde(rename = "natural")]
    Natural,
    #[serde(rename = "improv")]
    Improvised,
    #[serde(rename = "siege")]
    Siege,
}

impl WeaponType {
    pub const DEFAULT: WeaponType = WeaponType::SimpleMelee;

    pub fn key(&self) -> &'static str {
        match self {
            WeaponType::SimpleMelee => "simpleM",
            WeaponType::SimpleRanged => "simpleR",
            WeaponType::MartialMelee => "martialM",
            WeaponType::MartialRanged => "martialR",
            WeaponType::Natural => "natural",
            WeaponType::Improvised => "improv",
            WeaponType::Siege => "siege",
        }
    }
}

/// Keys of the weapon property flag mapping.
pub const WEAPON_PROPERTIES: &[&str] = &[
    "ada", "amm", "fin", "fir", "foc", "hvy", "lgt", "lod", "mgc", "rch", "rel", "ret", "sil",
    "spc", "thr", "two", "ver",
];

/// Creature sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorSize {
    #[serde(rename = "tiny")]
    Tiny,
    #[serde(rename = "sm")]
    Small,
    #[default]
    #[serde(rename = "med")]
    Medium,
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "huge")]
    Huge,
    #[serde(rename = "grg")]
    Gargantuan,
}

impl ActorSize {
    pub fn all() -> &'static [ActorSize] {
        &[
            ActorSize::Tiny,
            ActorSize::Small,
            ActorSize::Medium,
            ActorSize::Large,
            ActorSize::Huge,
            ActorSize::Gargantuan,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ActorSize::Tiny => "tiny",
            ActorSize::Small => "sm",
            ActorSize::Medium => "med",
            ActorSize::Large => "lg",
            ActorSize::Huge => "huge",
            ActorSize::Gargantuan => "grg",
        }
    }
}

/// Choice list for a keyed table, e.g. `keys(ActorSize::all(), ActorSize::key)`.
pub fn keys<T: Copy>(table: &[T], key: fn(&T) -> &'static str) -> Vec<&'static str> {
    table.iter().map(key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_label_lookup_is_case_insensitive() {
        assert_eq!(ItemRarity::from_label("very rare"), Some(ItemRarity::VeryRare));
        assert_eq!(ItemRarity::from_label("LEGENDARY"), Some(ItemRarity::Legendary));
        assert_eq!(ItemRarity::from_label("mythic"), None);
    }

    #[test]
    fn rarity_parse_accepts_keys_and_labels() {
        assert_eq!("veryRare".parse::<ItemRarity>().unwrap(), ItemRarity::VeryRare);
        assert_eq!("Very Rare".parse::<ItemRarity>().unwrap(), ItemRarity::VeryRare);
        assert!("mythic".parse::<ItemRarity>().is_err());
    }

    #[test]
    fn rarity_serializes_as_key() {
        let json = serde_json::to_string(&ItemRarity::VeryRare).unwrap();
        assert_eq!(json, "\"veryRare\"");
    }

    #[test]
    fn attunement_codes_round_trip() {
        for code in 0..3 {
            assert_eq!(AttunementType::from_code(code).unwrap().code(), code);
        }
        assert_eq!(AttunementType::from_code(7), None);
    }

    #[test]
    fn table_keys() {
        assert_eq!(
            keys(ActorSize::all(), ActorSize::key),
            vec!["tiny", "sm", "med", "lg", "huge", "grg"]
        );
        assert_eq!(WeaponType::DEFAULT.key(), "simpleM");
        assert!(WEAPON_PROPERTIES.contains(&"fin"));
    }
}

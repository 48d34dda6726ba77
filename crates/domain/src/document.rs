//! Persisted documents and the subtype keys that select their schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::ids::DocumentId;

/// Broad document families, each with its own set of subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentKind {
    Actor,
    Item,
    JournalEntryPage,
    /// Advancement configuration embedded in class-like items
    Advancement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Actor => "Actor",
            DocumentKind::Item => "Item",
            DocumentKind::JournalEntryPage => "JournalEntryPage",
            DocumentKind::Advancement => "Advancement",
        }
    }

    /// Subtypes registered for this kind.
    pub fn subtypes(&self) -> impl Iterator<Item = Subtype> + '_ {
        Subtype::all().iter().copied().filter(move |s| s.kind() == *self)
    }

    /// Resolve a stored `type` string within this kind.
    pub fn subtype(&self, name: &str) -> Result<Subtype, DomainError> {
        self.subtypes()
            .find(|subtype| subtype.type_name() == name)
            .ok_or_else(|| DomainError::unknown_subtype(self.as_str(), name))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed registry key for one concrete subtype schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subtype {
    Character,
    Npc,
    Vehicle,
    Group,
    Weapon,
    Equipment,
    Consumable,
    Tool,
    Loot,
    Subclass,
    ClassPage,
    HitPoints,
    ItemGrant,
    ScaleValue,
}

impl Subtype {
    pub fn all() -> &'static [Subtype] {
        &[
            Subtype::Character,
            Subtype::Npc,
            Subtype::Vehicle,
            Subtype::Group,
            Subtype::Weapon,
            Subtype::Equipment,
            Subtype::Consumable,
            Subtype::Tool,
            Subtype::Loot,
            Subtype::Subclass,
            Subtype::ClassPage,
            Subtype::HitPoints,
            Subtype::ItemGrant,
            Subtype::ScaleValue,
        ]
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Subtype::Character | Subtype::Npc | Subtype::Vehicle | Subtype::Group => {
                DocumentKind::Actor
            }
            Subtype::Weapon
            | Subtype::Equipment
            | Subtype::Consumable
            | Subtype::Tool
            | Subtype::Loot
            | Subtype::Subclass => DocumentKind::Item,
            Subtype::ClassPage => DocumentKind::JournalEntryPage,
            Subtype::HitPoints | Subtype::ItemGrant | Subtype::ScaleValue => {
                DocumentKind::Advancement
            }
        }
    }

    /// The `type` string stored on documents of this subtype.
    pub fn type_name(&self) -> &'static str {
        match self {
            Subtype::Character => "character",
            Subtype::Npc => "npc",
            Subtype::Vehicle => "vehicle",
            Subtype::Group => "group",
            Subtype::Weapon => "weapon",
            Subtype::Equipment => "equipment",
            Subtype::Consumable => "consumable",
            Subtype::Tool => "tool",
            Subtype::Loot => "loot",
            Subtype::Subclass => "subclass",
            Subtype::ClassPage => "class",
            Subtype::HitPoints => "HitPoints",
            Subtype::ItemGrant => "ItemGrant",
            Subtype::ScaleValue => "ScaleValue",
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind(), self.type_name())
    }
}

impl FromStr for Subtype {
    type Err = DomainError;

    /// Parses the qualified form produced by `Display`, e.g. `Item.weapon`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once('.')
            .ok_or_else(|| DomainError::parse(format!("Expected '<Kind>.<type>', got '{s}'")))?;
        let kind = [
            DocumentKind::Actor,
            DocumentKind::Item,
            DocumentKind::JournalEntryPage,
            DocumentKind::Advancement,
        ]
        .into_iter()
        .find(|k| k.as_str() == kind)
        .ok_or_else(|| DomainError::parse(format!("Unknown document kind: '{kind}'")))?;
        kind.subtype(name)
    }
}

/// A document as the host stores it.
///
/// Only the keys the engine works with are typed; everything else rides along in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub subtype: String,
    #[serde(default)]
    pub system: Value,
    /// System version the document was last saved under; absent means legacy
    #[serde(
        rename = "systemVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub system_version: Option<String>,
    /// Embedded items owned by an actor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<PersistedDocument>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersistedDocument {
    pub fn new(id: impl Into<DocumentId>, subtype: &str, system: Value) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subtype: subtype.to_string(),
            system,
            system_version: None,
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.system_version = Some(version.into());
        self
    }

    pub fn with_items(mut self, items: Vec<PersistedDocument>) -> Self {
        self.items = items;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subtype_display_and_parse_agree() {
        for subtype in Subtype::all() {
            assert_eq!(subtype.to_string().parse::<Subtype>().unwrap(), *subtype);
        }
    }

    #[test]
    fn unknown_type_names_are_rejected() {
        let err = DocumentKind::Item.subtype("spaceship").unwrap_err();
        assert_eq!(err, DomainError::unknown_subtype("Item", "spaceship"));
        assert!("weapon".parse::<Subtype>().is_err());
        assert!("Ship.weapon".parse::<Subtype>().is_err());
    }

    #[test]
    fn kinds_partition_subtypes() {
        assert_eq!(DocumentKind::Actor.subtypes().count(), 4);
        assert_eq!(DocumentKind::Item.subtypes().count(), 6);
        assert_eq!(DocumentKind::JournalEntryPage.subtype("class").unwrap(), Subtype::ClassPage);
    }

    #[test]
    fn host_keys_survive_a_round_trip() {
        let raw = json!({
            "_id": "a1",
            "name": "Longsword",
            "type": "weapon",
            "system": {"price": 15},
            "img": "icons/sword.webp",
            "flags": {"core": {"sourceId": "x"}}
        });
        let doc: PersistedDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.id.as_str(), "a1");
        assert_eq!(doc.system_version, None);
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn actors_carry_embedded_items() {
        let raw = json!({
            "_id": "c1",
            "type": "character",
            "system": {},
            "systemVersion": "1.6.3",
            "items": [{"_id": "i1", "type": "loot", "system": {}}]
        });
        let doc: PersistedDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.system_version.as_deref(), Some("1.6.3"));
    }
}

//! Schema definitions for every built-in subtype.

pub mod actor;
pub mod advancement;
pub mod item;
pub mod journal;

use crate::document::Subtype;
use crate::error::DomainError;
use crate::schema::SubtypeSchema;

/// Build the schema for one subtype.
///
/// Deterministic: the same subtype always yields a structurally identical schema.
pub fn define_schema(subtype: Subtype) -> Result<SubtypeSchema, DomainError> {
    match subtype {
        Subtype::Character => actor::character(),
        Subtype::Npc => actor::npc(),
        Subtype::Vehicle => actor::vehicle(),
        Subtype::Group => actor::group(),
        Subtype::Weapon => item::weapon(),
        Subtype::Equipment => item::equipment(),
        Subtype::Consumable => item::consumable(),
        Subtype::Tool => item::tool(),
        Subtype::Loot => item::loot(),
        Subtype::Subclass => item::subclass(),
        Subtype::ClassPage => journal::class_page(),
        Subtype::HitPoints => advancement::hit_points(),
        Subtype::ItemGrant => advancement::item_grant(),
        Subtype::ScaleValue => advancement::scale_value(),
    }
}

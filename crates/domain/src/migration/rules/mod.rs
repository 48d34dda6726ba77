//! Field-level migration rules, grouped by the template or subtype that owns them.

pub mod activated_effect;
pub mod attributes;
pub mod equippable;
pub mod physical_item;
pub mod tool;
pub mod weapon;

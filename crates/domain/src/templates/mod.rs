//! Built-in templates shared by several subtypes.
//!
//! Item templates are composed at the top level of an item's `system` tree.
//! Actor field sets live inside nested objects (`attributes`, `details`,
//! `traits`) and are spliced in by each actor subtype.

pub mod actor;
pub mod item;

//! Schema primitives, composition and the subtype registry.

mod construct;
mod field;
mod registry;
mod template;
mod violation;

pub use construct::construct;
pub use field::{FieldDescriptor, FieldKind, SchemaFields};
pub use registry::{SchemaRegistry, SubtypeSchema};
pub use template::{compose, Template};
pub use violation::{Constraint, FieldPath, SchemaViolation};

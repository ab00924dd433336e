// models/src/lib.rs

//! Domain records for the hospital system: people, departments, rooms and
//! appointments, plus the value types the entity store queries against.

pub mod entity;
pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod properties;

pub use entity::{Entity, FieldAccessor, FieldAccessors};
pub use errors::{ValidationError, ValidationResult};
pub use identifiers::{DepartmentId, EntityId, Identifier};
pub use properties::{FieldKind, PropertyMap, PropertyValue};

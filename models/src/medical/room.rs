// models/src/medical/room.rs
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldAccessors};
use crate::errors::{require_text, ValidationResult};
use crate::identifiers::{DepartmentId, EntityId};
use crate::medical::Specialty;
use crate::properties::FieldKind;

/// A consulting room, operating theatre or similar bookable space.
///
/// Rooms are created through their department (`Hospital::create_room`) so
/// the specialty affinity always matches the department's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: Option<EntityId>,
    number: String,
    kind: String,
    department: DepartmentId,
    specialty: Specialty,
}

impl Room {
    pub(crate) fn new(
        number: impl Into<String>,
        kind: impl Into<String>,
        department: DepartmentId,
        specialty: Specialty,
    ) -> ValidationResult<Self> {
        Ok(Room {
            id: None,
            number: require_text(number, "room number")?,
            kind: require_text(kind, "room kind")?,
            department,
            specialty,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn department(&self) -> DepartmentId {
        self.department
    }

    pub fn specialty(&self) -> Specialty {
        self.specialty
    }
}

static ROOM_FIELDS: Lazy<FieldAccessors<Room>> = Lazy::new(|| {
    FieldAccessors::<Room>::new("Room")
        .field("id", FieldKind::Integer, |r| r.id.into())
        .field("number", FieldKind::String, |r| (&r.number).into())
        .field("kind", FieldKind::String, |r| (&r.kind).into())
        .field("department", FieldKind::Integer, |r| i64::try_from(r.department.0).unwrap_or(i64::MAX).into())
        .field("specialty", FieldKind::Specialty, |r| r.specialty.into())
});

impl Entity for Room {
    const ENTITY_NAME: &'static str = "Room";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field_accessors() -> &'static FieldAccessors<Self> {
        &ROOM_FIELDS
    }
}

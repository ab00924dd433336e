// models/src/medical/department.rs
use serde::{Deserialize, Serialize};

use crate::errors::{require_text, ValidationResult};
use crate::identifiers::EntityId;
use crate::medical::Specialty;

/// A department inside a hospital. Owned by value by its `Hospital`; the
/// links to the hospital, practitioners and rooms are plain identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    name: String,
    specialty: Specialty,
    hospital_id: Option<EntityId>,
    practitioner_ids: Vec<EntityId>,
    room_ids: Vec<EntityId>,
}

impl Department {
    pub fn new(name: impl Into<String>, specialty: Specialty) -> ValidationResult<Self> {
        Ok(Department {
            name: require_text(name, "department name")?,
            specialty,
            hospital_id: None,
            practitioner_ids: Vec::new(),
            room_ids: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specialty(&self) -> Specialty {
        self.specialty
    }

    pub fn hospital_id(&self) -> Option<EntityId> {
        self.hospital_id
    }

    pub fn practitioner_ids(&self) -> &[EntityId] {
        &self.practitioner_ids
    }

    pub fn room_ids(&self) -> &[EntityId] {
        &self.room_ids
    }

    pub(crate) fn set_hospital_id(&mut self, hospital_id: Option<EntityId>) {
        self.hospital_id = hospital_id;
    }

    pub(crate) fn add_practitioner(&mut self, id: EntityId) {
        if !self.practitioner_ids.contains(&id) {
            self.practitioner_ids.push(id);
        }
    }

    pub(crate) fn remove_practitioner(&mut self, id: EntityId) {
        self.practitioner_ids.retain(|p| *p != id);
    }

    pub(crate) fn add_room(&mut self, id: EntityId) {
        if !self.room_ids.contains(&id) {
            self.room_ids.push(id);
        }
    }
}

// models/src/medical/practitioner.rs
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldAccessors};
use crate::errors::{require_text, ValidationResult};
use crate::identifiers::{DepartmentId, EntityId};
use crate::medical::{PersonInfo, Specialty};
use crate::properties::FieldKind;

/// A licensed practitioner. Only the department assignment changes after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    id: Option<EntityId>,
    person: PersonInfo,
    license_number: String,
    specialty: Specialty,
    department: Option<DepartmentId>,
}

impl Practitioner {
    pub fn new(
        person: PersonInfo,
        license_number: impl Into<String>,
        specialty: Specialty,
    ) -> ValidationResult<Self> {
        let license_number = require_text(license_number, "license number")?;
        Ok(Practitioner {
            id: None,
            person,
            license_number,
            specialty,
            department: None,
        })
    }

    pub fn person(&self) -> &PersonInfo {
        &self.person
    }

    pub fn full_name(&self) -> String {
        self.person.full_name()
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn specialty(&self) -> Specialty {
        self.specialty
    }

    pub fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Reassigns the practitioner. Keeping the department's own roster in
    /// step is the hospital's job (see `Hospital::assign_practitioner`).
    pub fn set_department(&mut self, department: Option<DepartmentId>) {
        self.department = department;
    }
}

// Two practitioner records are the same person when the license matches.
impl PartialEq for Practitioner {
    fn eq(&self, other: &Self) -> bool {
        self.license_number == other.license_number
    }
}

impl Eq for Practitioner {}

static PRACTITIONER_FIELDS: Lazy<FieldAccessors<Practitioner>> = Lazy::new(|| {
    FieldAccessors::<Practitioner>::new("Practitioner")
        .field("id", FieldKind::Integer, |p| p.id.into())
        .field("first_name", FieldKind::String, |p| p.person.first_name().into())
        .field("last_name", FieldKind::String, |p| p.person.last_name().into())
        .field("national_id", FieldKind::String, |p| p.person.national_id().into())
        .field("date_of_birth", FieldKind::Date, |p| p.person.date_of_birth().into())
        .field("blood_type", FieldKind::BloodType, |p| p.person.blood_type().into())
        .field("license_number", FieldKind::String, |p| (&p.license_number).into())
        .field("specialty", FieldKind::Specialty, |p| p.specialty.into())
        .field("department", FieldKind::Integer, |p| {
            p.department
                .map(|d| i64::try_from(d.0).unwrap_or(i64::MAX))
                .into()
        })
});

impl Entity for Practitioner {
    const ENTITY_NAME: &'static str = "Practitioner";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field_accessors() -> &'static FieldAccessors<Self> {
        &PRACTITIONER_FIELDS
    }
}

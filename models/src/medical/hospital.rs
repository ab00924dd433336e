// models/src/medical/hospital.rs
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldAccessors};
use crate::errors::{require_text, ValidationError, ValidationResult};
use crate::identifiers::{DepartmentId, EntityId};
use crate::medical::{Department, Patient, Practitioner, Room, Specialty};
use crate::properties::FieldKind;

/// A hospital and the departments it owns.
///
/// Departments live inside the hospital and are addressed by
/// `DepartmentId` (their index). Practitioners, patients and rooms are
/// separate records and are only referenced by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    id: Option<EntityId>,
    name: String,
    address: String,
    phone: String,
    departments: Vec<Department>,
    patient_ids: Vec<EntityId>,
}

impl Hospital {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> ValidationResult<Self> {
        Ok(Hospital {
            id: None,
            name: require_text(name, "hospital name")?,
            address: require_text(address, "hospital address")?,
            phone: require_text(phone, "hospital phone")?,
            departments: Vec::new(),
            patient_ids: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.get(id.0)
    }

    /// First department serving `specialty`, if any.
    pub fn department_for(&self, specialty: Specialty) -> Option<(DepartmentId, &Department)> {
        self.departments
            .iter()
            .enumerate()
            .find(|(_, d)| d.specialty() == specialty)
            .map(|(i, d)| (DepartmentId(i), d))
    }

    pub fn patient_ids(&self) -> &[EntityId] {
        &self.patient_ids
    }

    /// Adds `department` and returns its stable index. Department names are
    /// unique within a hospital.
    pub fn add_department(&mut self, mut department: Department) -> ValidationResult<DepartmentId> {
        if self.departments.iter().any(|d| d.name() == department.name()) {
            return Err(ValidationError::DuplicateDepartment(department.name().to_string()));
        }
        department.set_hospital_id(self.id);
        self.departments.push(department);
        Ok(DepartmentId(self.departments.len() - 1))
    }

    /// Moves `practitioner` into `department`, taking them off the roster of
    /// the department they were in before. Assigning to the current
    /// department again is a no-op.
    pub fn assign_practitioner(
        &mut self,
        department: DepartmentId,
        practitioner: &mut Practitioner,
    ) -> ValidationResult<()> {
        let practitioner_id = practitioner
            .id()
            .ok_or(ValidationError::MissingIdentity("practitioner"))?;
        if department.0 >= self.departments.len() {
            return Err(ValidationError::UnknownDepartment(department.0));
        }
        if let Some(previous) = practitioner.department() {
            if previous != department {
                if let Some(old) = self.departments.get_mut(previous.0) {
                    old.remove_practitioner(practitioner_id);
                }
            }
        }
        self.departments[department.0].add_practitioner(practitioner_id);
        practitioner.set_department(Some(department));
        Ok(())
    }

    /// Registers `patient` with this hospital. Both must already be stored.
    pub fn register_patient(&mut self, patient: &mut Patient) -> ValidationResult<()> {
        let hospital_id = self.id.ok_or(ValidationError::MissingIdentity("hospital"))?;
        let patient_id = patient.id().ok_or(ValidationError::MissingIdentity("patient"))?;
        if !self.patient_ids.contains(&patient_id) {
            self.patient_ids.push(patient_id);
        }
        patient.set_hospital_id(hospital_id);
        Ok(())
    }

    /// Builds a room for `department`; the room inherits the department's
    /// specialty. Store the room, then `attach_room` it.
    pub fn create_room(
        &self,
        department: DepartmentId,
        number: impl Into<String>,
        kind: impl Into<String>,
    ) -> ValidationResult<Room> {
        let dept = self
            .department(department)
            .ok_or(ValidationError::UnknownDepartment(department.0))?;
        Room::new(number, kind, department, dept.specialty())
    }

    /// Lists a stored room on its department's roster.
    pub fn attach_room(&mut self, room: &Room) -> ValidationResult<()> {
        let room_id = room.id().ok_or(ValidationError::MissingIdentity("room"))?;
        let dept = self
            .departments
            .get_mut(room.department().0)
            .ok_or(ValidationError::UnknownDepartment(room.department().0))?;
        dept.add_room(room_id);
        Ok(())
    }
}

static HOSPITAL_FIELDS: Lazy<FieldAccessors<Hospital>> = Lazy::new(|| {
    FieldAccessors::<Hospital>::new("Hospital")
        .field("id", FieldKind::Integer, |h| h.id.into())
        .field("name", FieldKind::String, |h| (&h.name).into())
        .field("address", FieldKind::String, |h| (&h.address).into())
        .field("phone", FieldKind::String, |h| (&h.phone).into())
});

impl Entity for Hospital {
    const ENTITY_NAME: &'static str = "Hospital";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    // Departments carry the back-reference, so they learn the id too.
    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
        for department in &mut self.departments {
            department.set_hospital_id(Some(id));
        }
    }

    fn field_accessors() -> &'static FieldAccessors<Self> {
        &HOSPITAL_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medical::{BloodType, PersonInfo};
    use chrono::{NaiveDate, Utc};

    fn hospital() -> Hospital {
        Hospital::new("Hospital Central", "Av. Libertador 1234", "011-4567-8901").unwrap()
    }

    fn practitioner(license: &str, specialty: Specialty, id: u64) -> Practitioner {
        let person = PersonInfo::new(
            "Carlos",
            "Gonzalez",
            "12345678",
            NaiveDate::from_ymd_opt(1975, 5, 15).unwrap(),
            BloodType::APositive,
        )
        .unwrap();
        let mut p = Practitioner::new(person, license, specialty).unwrap();
        p.assign_id(EntityId(id));
        p
    }

    #[test]
    fn rejects_duplicate_department_names() {
        let mut h = hospital();
        h.add_department(Department::new("Cardiology", Specialty::Cardiology).unwrap()).unwrap();
        let err = h
            .add_department(Department::new("Cardiology", Specialty::Cardiology).unwrap())
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateDepartment("Cardiology".to_string()));
    }

    #[test]
    fn departments_learn_hospital_id_when_stored() {
        let mut h = hospital();
        let dept = h.add_department(Department::new("Pediatrics", Specialty::Pediatrics).unwrap()).unwrap();
        assert_eq!(h.department(dept).unwrap().hospital_id(), None);
        h.assign_id(EntityId(1));
        assert_eq!(h.department(dept).unwrap().hospital_id(), Some(EntityId(1)));
    }

    #[test]
    fn reassigning_a_practitioner_moves_them_between_rosters() {
        let mut h = hospital();
        let cardio = h.add_department(Department::new("Cardiology", Specialty::Cardiology).unwrap()).unwrap();
        let peds = h.add_department(Department::new("Pediatrics", Specialty::Pediatrics).unwrap()).unwrap();
        let mut p = practitioner("MP-12345", Specialty::Cardiology, 1);

        h.assign_practitioner(cardio, &mut p).unwrap();
        h.assign_practitioner(cardio, &mut p).unwrap();
        assert_eq!(h.department(cardio).unwrap().practitioner_ids(), [EntityId(1)]);

        h.assign_practitioner(peds, &mut p).unwrap();
        assert!(h.department(cardio).unwrap().practitioner_ids().is_empty());
        assert_eq!(h.department(peds).unwrap().practitioner_ids(), [EntityId(1)]);
        assert_eq!(p.department(), Some(peds));
    }

    #[test]
    fn unstored_practitioner_cannot_be_assigned() {
        let mut h = hospital();
        let cardio = h.add_department(Department::new("Cardiology", Specialty::Cardiology).unwrap()).unwrap();
        let person = PersonInfo::new(
            "Ana",
            "Martinez",
            "23456789",
            NaiveDate::from_ymd_opt(1980, 8, 22).unwrap(),
            BloodType::ONegative,
        )
        .unwrap();
        let mut p = Practitioner::new(person, "MP-23456", Specialty::Pediatrics).unwrap();
        let err = h.assign_practitioner(cardio, &mut p).unwrap_err();
        assert_eq!(err, ValidationError::MissingIdentity("practitioner"));
        assert_eq!(
            h.assign_practitioner(DepartmentId(7), &mut practitioner("MP-1", Specialty::Oncology, 3))
                .unwrap_err(),
            ValidationError::UnknownDepartment(7)
        );
    }

    #[test]
    fn rooms_inherit_department_specialty() {
        let mut h = hospital();
        let trauma = h
            .add_department(Department::new("Traumatology", Specialty::Traumatology).unwrap())
            .unwrap();
        let mut room = h.create_room(trauma, "TRAUMA-301", "Emergency").unwrap();
        assert_eq!(room.specialty(), Specialty::Traumatology);
        assert_eq!(h.attach_room(&room).unwrap_err(), ValidationError::MissingIdentity("room"));

        room.assign_id(EntityId(4));
        h.attach_room(&room).unwrap();
        assert_eq!(h.department(trauma).unwrap().room_ids(), [EntityId(4)]);
    }

    #[test]
    fn registering_patients_links_both_sides() {
        let mut h = hospital();
        let person = PersonInfo::new(
            "Erica",
            "Cruz",
            "33333333",
            NaiveDate::from_ymd_opt(1992, 9, 28).unwrap(),
            BloodType::AbNegative,
        )
        .unwrap();
        let mut patient = Patient::new(person, "011-3333-3333", "Belgrano 789", Utc::now()).unwrap();
        patient.assign_id(EntityId(2));

        assert_eq!(
            h.register_patient(&mut patient).unwrap_err(),
            ValidationError::MissingIdentity("hospital")
        );
        h.assign_id(EntityId(1));
        h.register_patient(&mut patient).unwrap();
        h.register_patient(&mut patient).unwrap();
        assert_eq!(h.patient_ids(), [EntityId(2)]);
        assert_eq!(patient.hospital_id(), Some(EntityId(1)));
    }
}

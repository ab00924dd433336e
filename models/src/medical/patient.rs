// models/src/medical/patient.rs
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldAccessors};
use crate::errors::{require_text, ValidationResult};
use crate::identifiers::EntityId;
use crate::medical::{BloodType, ClinicalRecord, PersonInfo};
use crate::properties::FieldKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    id: Option<EntityId>,
    person: PersonInfo,
    phone: String,
    address: String,
    hospital_id: Option<EntityId>,
    record: ClinicalRecord,
}

impl Patient {
    /// Builds a patient and opens their clinical record at `opened_at`.
    pub fn new(
        person: PersonInfo,
        phone: impl Into<String>,
        address: impl Into<String>,
        opened_at: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        let phone = require_text(phone, "phone")?;
        let address = require_text(address, "address")?;
        let record = ClinicalRecord::open(person.national_id(), opened_at);
        Ok(Patient {
            id: None,
            person,
            phone,
            address,
            hospital_id: None,
            record,
        })
    }

    pub fn person(&self) -> &PersonInfo {
        &self.person
    }

    pub fn full_name(&self) -> String {
        self.person.full_name()
    }

    pub fn blood_type(&self) -> BloodType {
        self.person.blood_type()
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn hospital_id(&self) -> Option<EntityId> {
        self.hospital_id
    }

    pub(crate) fn set_hospital_id(&mut self, hospital_id: EntityId) {
        self.hospital_id = Some(hospital_id);
    }

    pub fn record(&self) -> &ClinicalRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut ClinicalRecord {
        &mut self.record
    }
}

static PATIENT_FIELDS: Lazy<FieldAccessors<Patient>> = Lazy::new(|| {
    FieldAccessors::<Patient>::new("Patient")
        .field("id", FieldKind::Integer, |p| p.id.into())
        .field("first_name", FieldKind::String, |p| p.person.first_name().into())
        .field("last_name", FieldKind::String, |p| p.person.last_name().into())
        .field("national_id", FieldKind::String, |p| p.person.national_id().into())
        .field("date_of_birth", FieldKind::Date, |p| p.person.date_of_birth().into())
        .field("blood_type", FieldKind::BloodType, |p| p.person.blood_type().into())
        .field("phone", FieldKind::String, |p| (&p.phone).into())
        .field("address", FieldKind::String, |p| (&p.address).into())
        .field("hospital_id", FieldKind::Integer, |p| p.hospital_id.into())
        .field("record_number", FieldKind::String, |p| p.record.record_number().into())
});

impl Entity for Patient {
    const ENTITY_NAME: &'static str = "Patient";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field_accessors() -> &'static FieldAccessors<Self> {
        &PATIENT_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::properties::PropertyValue;
    use chrono::{NaiveDate, TimeZone};

    fn leila() -> PersonInfo {
        PersonInfo::new(
            "Leila",
            "Cruz",
            "46063438",
            NaiveDate::from_ymd_opt(1985, 12, 5).unwrap(),
            BloodType::APositive,
        )
        .unwrap()
    }

    #[test]
    fn opens_clinical_record_on_creation() {
        let opened = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let patient = Patient::new(leila(), "549-2622-356607", "Calle Falsa 123", opened).unwrap();
        assert_eq!(patient.record().record_number(), "HC-46063438-2025");
        assert!(patient.record().diagnoses().is_empty());
    }

    #[test]
    fn rejects_blank_contact_data() {
        let err = Patient::new(leila(), "", "Calle Falsa 123", Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::BlankField("phone"));
        let err = Patient::new(leila(), "011-1111", " ", Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::BlankField("address"));
    }

    #[test]
    fn clinical_record_is_mutable_through_the_patient() {
        let mut patient = Patient::new(leila(), "011-1111", "Belgrano 789", Utc::now()).unwrap();
        patient.record_mut().add_allergy("Penicillin");
        assert_eq!(patient.record().allergies(), ["Penicillin"]);
    }

    #[test]
    fn blood_type_is_queryable() {
        let patient = Patient::new(leila(), "011-1111", "Belgrano 789", Utc::now()).unwrap();
        assert_eq!(patient.field("blood_type"), Some(PropertyValue::BloodType(BloodType::APositive)));
    }
}

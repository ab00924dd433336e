// server/src/cli/registry.rs

// Explicitly constructed set of stores the CLI works against, plus the
// sample data the demo seeds into them.
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};

use hospital_core::config::HospitalSection;
use hospital_core::{AppointmentScheduler, Clock, EntityStore};
use hospital_models::medical::{
    BloodType, Department, Hospital, Patient, PersonInfo, Practitioner, Room, Specialty,
};
use hospital_models::{Entity, EntityId};

pub struct Registry {
    pub hospitals: EntityStore<Hospital>,
    pub practitioners: EntityStore<Practitioner>,
    pub patients: EntityStore<Patient>,
    pub rooms: EntityStore<Room>,
    pub scheduler: AppointmentScheduler,
    clock: Arc<dyn Clock>,
}

struct PersonSeed {
    first_name: &'static str,
    last_name: &'static str,
    national_id: &'static str,
    born: (i32, u32, u32),
    blood_type: BloodType,
}

struct PractitionerSeed {
    person: PersonSeed,
    license_number: &'static str,
    specialty: Specialty,
}

struct PatientSeed {
    person: PersonSeed,
    phone: &'static str,
    address: &'static str,
    diagnoses: &'static [&'static str],
    treatments: &'static [&'static str],
    allergies: &'static [&'static str],
}

const DEPARTMENTS: [(&str, Specialty); 3] = [
    ("Cardiology", Specialty::Cardiology),
    ("Pediatrics", Specialty::Pediatrics),
    ("Traumatology", Specialty::Traumatology),
];

const ROOMS: [(Specialty, &str, &str); 4] = [
    (Specialty::Cardiology, "CARD-101", "Consultation room"),
    (Specialty::Cardiology, "CARD-102", "Operating theatre"),
    (Specialty::Pediatrics, "PED-201", "Consultation room"),
    (Specialty::Traumatology, "TRAUMA-301", "Emergency room"),
];

const PRACTITIONERS: [PractitionerSeed; 3] = [
    PractitionerSeed {
        person: PersonSeed {
            first_name: "Carlos",
            last_name: "González",
            national_id: "12345678",
            born: (1975, 5, 15),
            blood_type: BloodType::APositive,
        },
        license_number: "MP-12345",
        specialty: Specialty::Cardiology,
    },
    PractitionerSeed {
        person: PersonSeed {
            first_name: "Ana",
            last_name: "Martínez",
            national_id: "23456789",
            born: (1980, 8, 22),
            blood_type: BloodType::ONegative,
        },
        license_number: "MP-23456",
        specialty: Specialty::Pediatrics,
    },
    PractitionerSeed {
        person: PersonSeed {
            first_name: "Luis",
            last_name: "Rodríguez",
            national_id: "34567890",
            born: (1978, 3, 10),
            blood_type: BloodType::BPositive,
        },
        license_number: "MP-34567",
        specialty: Specialty::Traumatology,
    },
];

const PATIENTS: [PatientSeed; 3] = [
    PatientSeed {
        person: PersonSeed {
            first_name: "Leila",
            last_name: "Cruz",
            national_id: "46063438",
            born: (1985, 12, 5),
            blood_type: BloodType::APositive,
        },
        phone: "549-2622-356607",
        address: "Calle Falsa 123",
        diagnoses: &["Arterial hypertension"],
        treatments: &["Enalapril 10mg"],
        allergies: &["Penicillin"],
    },
    PatientSeed {
        person: PersonSeed {
            first_name: "Máximo",
            last_name: "Fran",
            national_id: "00000000",
            born: (2010, 6, 15),
            blood_type: BloodType::OPositive,
        },
        phone: "011-2222-2222",
        address: "Av. Siempreviva 456",
        diagnoses: &["Routine pediatric check-up"],
        treatments: &["Vaccination schedule up to date"],
        allergies: &[],
    },
    PatientSeed {
        person: PersonSeed {
            first_name: "Erica",
            last_name: "Cruz",
            national_id: "33333333",
            born: (1992, 9, 28),
            blood_type: BloodType::AbNegative,
        },
        phone: "011-3333-3333",
        address: "Belgrano 789",
        diagnoses: &["Wrist fracture"],
        treatments: &["Immobilisation and physiotherapy"],
        allergies: &["Ibuprofen"],
    },
];

impl PersonSeed {
    fn build(&self) -> Result<PersonInfo> {
        let (year, month, day) = self.born;
        let born = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| anyhow!("Invalid birth date for {}", self.first_name))?;
        Ok(PersonInfo::new(
            self.first_name,
            self.last_name,
            self.national_id,
            born,
            self.blood_type,
        )?)
    }
}

impl Registry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Registry {
            hospitals: EntityStore::new(),
            practitioners: EntityStore::new(),
            patients: EntityStore::new(),
            rooms: EntityStore::new(),
            scheduler: AppointmentScheduler::new(Arc::clone(&clock)),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The hospital the sample data was seeded into.
    pub fn hospital(&self) -> Result<Hospital> {
        self.hospitals
            .first_where(|_| true)?
            .ok_or_else(|| anyhow!("No hospital has been registered"))
    }

    pub fn practitioner_by_license(&self, license_number: &str) -> Result<Practitioner> {
        self.practitioners
            .first_where(|p| p.license_number() == license_number)?
            .ok_or_else(|| anyhow!("No practitioner with license {}", license_number))
    }

    pub fn patient_by_national_id(&self, national_id: &str) -> Result<Patient> {
        self.patients
            .first_where(|p| p.person().national_id() == national_id)?
            .ok_or_else(|| anyhow!("No patient with national id {}", national_id))
    }

    pub fn room_by_number(&self, number: &str) -> Result<Room> {
        self.rooms
            .first_where(|r| r.number() == number)?
            .ok_or_else(|| anyhow!("No room numbered {}", number))
    }

    /// Registers the sample hospital with its departments, rooms,
    /// practitioners and patients. Returns the hospital identity.
    pub fn seed(&self, section: &HospitalSection) -> Result<EntityId> {
        let mut hospital = Hospital::new(&section.name, &section.address, &section.phone)
            .context("Invalid [hospital] section")?;
        for (name, specialty) in DEPARTMENTS {
            hospital.add_department(Department::new(name, specialty)?)?;
        }
        let mut hospital = self.hospitals.insert(hospital)?;
        let hospital_id = hospital
            .id()
            .ok_or_else(|| anyhow!("Stored hospital has no identity"))?;
        info!("Registered hospital {} (#{})", hospital.name(), hospital_id);

        for (specialty, number, kind) in ROOMS {
            let (department, _) = hospital
                .department_for(specialty)
                .ok_or_else(|| anyhow!("No department serves {}", specialty))?;
            let room = self.rooms.insert(hospital.create_room(department, number, kind)?)?;
            hospital.attach_room(&room)?;
            debug!("Created room {} for {}", number, specialty);
        }

        for seed in &PRACTITIONERS {
            let practitioner =
                Practitioner::new(seed.person.build()?, seed.license_number, seed.specialty)?;
            let mut practitioner = self.practitioners.insert(practitioner)?;
            if let Some((department, _)) = hospital.department_for(seed.specialty) {
                hospital.assign_practitioner(department, &mut practitioner)?;
                self.practitioners.update(practitioner)?;
            }
        }

        let opened_at = self.now();
        for seed in &PATIENTS {
            let mut patient = Patient::new(seed.person.build()?, seed.phone, seed.address, opened_at)?;
            let record = patient.record_mut();
            seed.diagnoses.iter().for_each(|d| record.add_diagnosis(*d));
            seed.treatments.iter().for_each(|t| record.add_treatment(*t));
            seed.allergies.iter().for_each(|a| record.add_allergy(*a));

            let mut patient = self.patients.insert(patient)?;
            hospital.register_patient(&mut patient)?;
            self.patients.update(patient)?;
        }

        self.hospitals.update(hospital)?;
        info!(
            "Seeded {} rooms, {} practitioners and {} patients",
            self.rooms.size()?,
            self.practitioners.size()?,
            self.patients.size()?
        );
        Ok(hospital_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use hospital_core::FixedClock;

    pub(crate) fn seeded() -> Registry {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap());
        let registry = Registry::new(Arc::new(clock));
        registry.seed(&HospitalSection::default()).unwrap();
        registry
    }

    #[test]
    fn seed_registers_every_record() {
        let registry = seeded();
        assert_eq!(registry.hospitals.size().unwrap(), 1);
        assert_eq!(registry.rooms.size().unwrap(), 4);
        assert_eq!(registry.practitioners.size().unwrap(), 3);
        assert_eq!(registry.patients.size().unwrap(), 3);
        assert!(registry.scheduler.is_empty().unwrap());
    }

    #[test]
    fn seeded_records_link_back_to_the_hospital() {
        let registry = seeded();
        let hospital = registry.hospital().unwrap();
        assert_eq!(hospital.name(), "Hospital Central");
        assert_eq!(hospital.departments().len(), 3);
        assert_eq!(hospital.patient_ids().len(), 3);

        let (cardio, department) = hospital.department_for(Specialty::Cardiology).unwrap();
        assert_eq!(department.room_ids().len(), 2);
        assert_eq!(department.hospital_id(), hospital.id());

        let carlos = registry.practitioner_by_license("MP-12345").unwrap();
        assert_eq!(carlos.department(), Some(cardio));

        let leila = registry.patient_by_national_id("46063438").unwrap();
        assert_eq!(leila.hospital_id(), hospital.id());
        assert_eq!(leila.record().record_number(), "HC-46063438-2025");
        assert_eq!(leila.record().allergies(), ["Penicillin".to_string()]);

        let trauma = registry.room_by_number("TRAUMA-301").unwrap();
        assert_eq!(trauma.specialty(), Specialty::Traumatology);
    }

    #[test]
    fn lookups_report_missing_records() {
        let registry = seeded();
        assert!(registry.practitioner_by_license("MP-00000").is_err());
        assert!(registry.room_by_number("ONC-401").is_err());

        let empty = Registry::new(Arc::new(hospital_core::SystemClock));
        assert!(empty.hospital().is_err());
    }
}

// models/src/medical/mod.rs
pub mod appointment;
pub mod blood_type;
pub mod department;
pub mod hospital;
pub mod medical_record;
pub mod patient;
pub mod person;
pub mod practitioner;
pub mod room;
pub mod specialty;

pub use appointment::{Appointment, AppointmentStatus};
pub use blood_type::BloodType;
pub use department::Department;
pub use hospital::Hospital;
pub use medical_record::ClinicalRecord;
pub use patient::Patient;
pub use person::PersonInfo;
pub use practitioner::Practitioner;
pub use room::Room;
pub use specialty::Specialty;

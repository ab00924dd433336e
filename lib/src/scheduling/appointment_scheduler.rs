// lib/src/scheduling/appointment_scheduler.rs
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use log::{info, warn};
use rust_decimal::Decimal;

use hospital_models::medical::{Appointment, AppointmentStatus, Patient, Practitioner, Room};
use hospital_models::{Entity, EntityId, PropertyValue};

use crate::errors::{SchedulingError, SchedulingResult, StoreError, StoreResult};
use crate::scheduling::clock::{Clock, SystemClock};
use crate::storage_engine::EntityStore;

/// Validates booking requests and owns the appointments it accepts.
///
/// `schedule` holds the scheduler's write lock from the conflict checks
/// through the insert, so two requests for the same slot cannot both pass.
/// Queries take the read lock and never see a booking half-registered.
///
/// The appointment store is private: bookings enter only through
/// `schedule` and change only through the status and notes updates, and
/// every read hands back a detached copy.
pub struct AppointmentScheduler {
    clock: Arc<dyn Clock>,
    appointments: EntityStore<Appointment>,
    // Patient identity -> appointment identities, in booking order.
    by_patient: RwLock<HashMap<EntityId, Vec<EntityId>>>,
}

impl AppointmentScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        AppointmentScheduler {
            clock,
            appointments: EntityStore::new(),
            by_patient: RwLock::new(HashMap::new()),
        }
    }

    /// A scheduler on wall-clock time.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Appointment>> {
        self.appointments.find_by_id(id)
    }

    /// Every accepted appointment in ascending identity order.
    pub fn find_all(&self) -> StoreResult<Vec<Appointment>> {
        self.appointments.find_all()
    }

    pub fn find_by_field(&self, field: &str, value: impl Into<PropertyValue>) -> StoreResult<Vec<Appointment>> {
        self.appointments.find_by_field(field, value)
    }

    /// Appointments whose `field` equals `raw` read as that field's kind.
    pub fn find_by_field_text(&self, field: &str, raw: &str) -> StoreResult<Vec<Appointment>> {
        self.appointments.find_by_field_text(field, raw)
    }

    pub fn first_where<F>(&self, predicate: F) -> StoreResult<Option<Appointment>>
    where
        F: Fn(&Appointment) -> bool,
    {
        self.appointments.first_where(predicate)
    }

    pub fn size(&self) -> StoreResult<usize> {
        self.appointments.size()
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.appointments.is_empty()
    }

    /// Books `patient` with `practitioner` in `room` at `when`.
    ///
    /// Rules are checked in this order and the first failure is returned:
    /// all three records are stored; `when` is after now; `cost` is not
    /// negative; practitioner and room share a specialty; the practitioner
    /// is free at `when`; the room is free at `when`. A rejected request
    /// changes nothing.
    pub fn schedule(
        &self,
        patient: &Patient,
        practitioner: &Practitioner,
        room: &Room,
        when: DateTime<Utc>,
        cost: Decimal,
    ) -> SchedulingResult<Appointment> {
        let result = self.try_schedule(patient, practitioner, room, when, cost);
        match &result {
            Ok(appointment) => info!(
                "Scheduled appointment #{} for patient #{} with practitioner #{} in room {} at {}",
                appointment.id().map_or(0, EntityId::value),
                appointment.patient_id(),
                appointment.practitioner_id(),
                room.number(),
                when
            ),
            Err(e) => warn!("Rejected appointment for {}: {}", patient.full_name(), e),
        }
        result
    }

    fn try_schedule(
        &self,
        patient: &Patient,
        practitioner: &Practitioner,
        room: &Room,
        when: DateTime<Utc>,
        cost: Decimal,
    ) -> SchedulingResult<Appointment> {
        let patient_id = require_id(patient, "patient")?;
        let practitioner_id = require_id(practitioner, "practitioner")?;
        let room_id = require_id(room, "room")?;

        let now = self.clock.now();
        if when <= now {
            return Err(SchedulingError::PastDate { requested: when, now });
        }
        if cost < Decimal::ZERO {
            return Err(SchedulingError::NegativeCost(cost));
        }
        if practitioner.specialty() != room.specialty() {
            return Err(SchedulingError::IncompatibleSpecialty {
                practitioner: practitioner.specialty(),
                room: room.specialty(),
            });
        }

        let mut by_patient = self.by_patient.write().map_err(StoreError::from)?;

        if let Some(existing) = self
            .appointments
            .first_where(|a| a.practitioner_id() == practitioner_id && a.scheduled_at() == when)?
        {
            return Err(SchedulingError::PractitionerConflict {
                practitioner_id,
                at: when,
                conflicting: existing.id().unwrap_or(EntityId(0)),
            });
        }
        if let Some(existing) = self
            .appointments
            .first_where(|a| a.room_id() == room_id && a.scheduled_at() == when)?
        {
            return Err(SchedulingError::RoomConflict {
                room_id,
                at: when,
                conflicting: existing.id().unwrap_or(EntityId(0)),
            });
        }

        let appointment = self.appointments.insert(Appointment::new(
            patient_id,
            practitioner_id,
            room_id,
            when,
            cost,
        ))?;
        if let Some(id) = appointment.id() {
            by_patient.entry(patient_id).or_default().push(id);
        }
        Ok(appointment)
    }

    /// The patient's appointments in booking order. Empty when there are
    /// none, including for a patient that was never stored.
    pub fn appointments_for(&self, patient: &Patient) -> SchedulingResult<Vec<Appointment>> {
        let Some(patient_id) = patient.id() else {
            return Ok(Vec::new());
        };
        let by_patient = self.by_patient.read().map_err(StoreError::from)?;
        let Some(ids) = by_patient.get(&patient_id) else {
            return Ok(Vec::new());
        };
        let mut appointments = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(appointment) = self.appointments.find_by_id(*id)? {
                appointments.push(appointment);
            }
        }
        Ok(appointments)
    }

    /// Sets the status of appointment `id` without consulting the life cycle.
    pub fn update_status(&self, id: EntityId, status: AppointmentStatus) -> SchedulingResult<Appointment> {
        self.modify(id, |appointment| {
            appointment.set_status(status);
            Ok(())
        })
    }

    /// Moves appointment `id` to `next` if the life cycle allows it.
    pub fn transition_status(&self, id: EntityId, next: AppointmentStatus) -> SchedulingResult<Appointment> {
        self.modify(id, |appointment| Ok(appointment.transition_to(next)?))
    }

    pub fn update_notes(&self, id: EntityId, notes: &str) -> SchedulingResult<Appointment> {
        self.modify(id, |appointment| {
            appointment.set_notes(notes);
            Ok(())
        })
    }

    // Read-modify-write under the scheduler lock so it cannot interleave
    // with a booking.
    fn modify<F>(&self, id: EntityId, change: F) -> SchedulingResult<Appointment>
    where
        F: FnOnce(&mut Appointment) -> SchedulingResult<()>,
    {
        let _guard = self.by_patient.write().map_err(StoreError::from)?;
        let mut appointment = self
            .appointments
            .find_by_id(id)?
            .ok_or(SchedulingError::UnknownAppointment(id))?;
        change(&mut appointment)?;
        self.appointments.update(appointment.clone())?;
        Ok(appointment)
    }
}

fn require_id<T: Entity>(entity: &T, role: &str) -> SchedulingResult<EntityId> {
    entity.id().ok_or_else(|| {
        SchedulingError::InvalidArgument(format!("{} has not been stored (no identity)", role))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::clock::FixedClock;
    use chrono::{Duration, NaiveDate, TimeZone};
    use hospital_models::medical::{BloodType, Department, Hospital, PersonInfo, Specialty};
    use std::str::FromStr;

    struct Fixture {
        clock: FixedClock,
        scheduler: AppointmentScheduler,
        cardiologist: Practitioner,
        pediatrician: Practitioner,
        card_101: Room,
        card_102: Room,
        ped_201: Room,
        p1: Patient,
        p2: Patient,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn person(first: &str, national_id: &str) -> PersonInfo {
        PersonInfo::new(
            first,
            "Test",
            national_id,
            NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            BloodType::APositive,
        )
        .unwrap()
    }

    fn fixture() -> Fixture {
        let clock = FixedClock::new(now());
        let scheduler = AppointmentScheduler::new(Arc::new(clock.clone()));

        let mut hospital = Hospital::new("Hospital Central", "Av. Libertador 1234", "011-4567-8901").unwrap();
        let cardio = hospital.add_department(Department::new("Cardiology", Specialty::Cardiology).unwrap()).unwrap();
        let peds = hospital.add_department(Department::new("Pediatrics", Specialty::Pediatrics).unwrap()).unwrap();

        let rooms: EntityStore<Room> = EntityStore::new();
        let card_101 = rooms.insert(hospital.create_room(cardio, "CARD-101", "Office").unwrap()).unwrap();
        let card_102 = rooms.insert(hospital.create_room(cardio, "CARD-102", "Theatre").unwrap()).unwrap();
        let ped_201 = rooms.insert(hospital.create_room(peds, "PED-201", "Office").unwrap()).unwrap();

        let practitioners: EntityStore<Practitioner> = EntityStore::new();
        let cardiologist = practitioners
            .insert(Practitioner::new(person("CardiologistA", "1"), "MP-1", Specialty::Cardiology).unwrap())
            .unwrap();
        let pediatrician = practitioners
            .insert(Practitioner::new(person("PediatricianB", "2"), "MP-2", Specialty::Pediatrics).unwrap())
            .unwrap();

        let patients: EntityStore<Patient> = EntityStore::new();
        let p1 = patients
            .insert(Patient::new(person("P1", "10"), "011-1", "Street 1", now()).unwrap())
            .unwrap();
        let p2 = patients
            .insert(Patient::new(person("P2", "20"), "011-2", "Street 2", now()).unwrap())
            .unwrap();

        Fixture {
            clock,
            scheduler,
            cardiologist,
            pediatrician,
            card_101,
            card_102,
            ped_201,
            p1,
            p2,
        }
    }

    fn cost(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[test]
    fn accepted_booking_is_scheduled_and_indexed() {
        let f = fixture();
        let when = now() + Duration::hours(24);
        let appointment = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("150000.00"))
            .unwrap();

        assert_eq!(appointment.id(), Some(EntityId(1)));
        assert_eq!(appointment.status(), AppointmentStatus::Scheduled);
        assert_eq!(appointment.cost(), cost("150000.00"));
        assert_eq!(f.scheduler.appointments_for(&f.p1).unwrap(), vec![appointment]);
        assert_eq!(f.scheduler.size().unwrap(), 1);
    }

    #[test]
    fn same_practitioner_same_time_conflicts() {
        let f = fixture();
        let when = now() + Duration::hours(24);
        f.scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("150000.00"))
            .unwrap();

        let err = f
            .scheduler
            .schedule(&f.p2, &f.cardiologist, &f.card_102, when, cost("150000.00"))
            .unwrap_err();
        assert_eq!(
            err,
            SchedulingError::PractitionerConflict {
                practitioner_id: EntityId(1),
                at: when,
                conflicting: EntityId(1),
            }
        );
        assert_eq!(f.scheduler.size().unwrap(), 1);
        assert!(f.scheduler.appointments_for(&f.p2).unwrap().is_empty());
    }

    #[test]
    fn same_room_same_time_conflicts() {
        let f = fixture();
        let when = now() + Duration::hours(24);
        f.scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("100"))
            .unwrap();

        let other = {
            let practitioners: EntityStore<Practitioner> = EntityStore::new();
            practitioners.insert(f.cardiologist.clone()).unwrap();
            practitioners
                .insert(Practitioner::new(person("CardiologistC", "3"), "MP-3", Specialty::Cardiology).unwrap())
                .unwrap()
        };
        let err = f
            .scheduler
            .schedule(&f.p2, &other, &f.card_101, when, cost("100"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::RoomConflict { conflicting: EntityId(1), .. }));
    }

    #[test]
    fn different_slot_practitioner_and_room_succeeds() {
        let f = fixture();
        let when = now() + Duration::hours(24);
        f.scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("100"))
            .unwrap();
        let second = f
            .scheduler
            .schedule(&f.p2, &f.pediatrician, &f.ped_201, when + Duration::hours(1), cost("80000.00"))
            .unwrap();
        assert_eq!(second.id(), Some(EntityId(2)));
    }

    #[test]
    fn past_and_present_times_are_rejected() {
        let f = fixture();
        let past = Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap();
        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, past, cost("100000.00"))
            .unwrap_err();
        assert_eq!(err, SchedulingError::PastDate { requested: past, now: now() });

        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, now(), cost("1"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::PastDate { .. }));
        assert!(f.scheduler.is_empty().unwrap());
        assert!(f.scheduler.appointments_for(&f.p1).unwrap().is_empty());
    }

    #[test]
    fn now_comes_from_the_injected_clock() {
        let f = fixture();
        let when = now() + Duration::hours(1);
        f.clock.advance(Duration::hours(2));
        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("1"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::PastDate { .. }));
    }

    #[test]
    fn negative_cost_is_rejected_and_zero_is_fine() {
        let f = fixture();
        let when = now() + Duration::days(2);
        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("-50000.00"))
            .unwrap_err();
        assert_eq!(err, SchedulingError::NegativeCost(cost("-50000.00")));
        assert!(f.scheduler.is_empty().unwrap());

        f.scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, Decimal::ZERO)
            .unwrap();
    }

    #[test]
    fn cross_specialty_booking_is_rejected() {
        let f = fixture();
        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.ped_201, now() + Duration::days(1), cost("1"))
            .unwrap_err();
        assert_eq!(
            err,
            SchedulingError::IncompatibleSpecialty {
                practitioner: Specialty::Cardiology,
                room: Specialty::Pediatrics,
            }
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let f = fixture();
        let past = now() - Duration::days(1);
        // Past date, negative cost and wrong specialty all at once.
        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.ped_201, past, cost("-1"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::PastDate { .. }));

        let err = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.ped_201, now() + Duration::days(1), cost("-1"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NegativeCost(_)));
    }

    #[test]
    fn unstored_records_are_invalid_arguments() {
        let f = fixture();
        let loose = Patient::new(person("Loose", "99"), "011-9", "Nowhere 1", now()).unwrap();
        let err = f
            .scheduler
            .schedule(&loose, &f.cardiologist, &f.card_101, now() + Duration::days(1), cost("1"))
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidArgument(_)));
        assert!(f.scheduler.appointments_for(&loose).unwrap().is_empty());
    }

    #[test]
    fn appointments_for_keeps_booking_order() {
        let f = fixture();
        let first = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, now() + Duration::days(3), cost("1"))
            .unwrap();
        let second = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, now() + Duration::days(1), cost("2"))
            .unwrap();
        let ids: Vec<_> = f
            .scheduler
            .appointments_for(&f.p1)
            .unwrap()
            .into_iter()
            .map(|a| a.id())
            .collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn status_and_notes_updates_are_visible_through_queries() {
        let f = fixture();
        let booked = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, now() + Duration::days(1), cost("1"))
            .unwrap();
        let id = booked.id().unwrap();

        f.scheduler.update_notes(id, "History of hypertension").unwrap();
        f.scheduler.transition_status(id, AppointmentStatus::InProgress).unwrap();
        let err = f
            .scheduler
            .transition_status(id, AppointmentStatus::Scheduled)
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Transition(_)));

        let stored = &f.scheduler.appointments_for(&f.p1).unwrap()[0];
        assert_eq!(stored.status(), AppointmentStatus::InProgress);
        assert_eq!(stored.notes(), "History of hypertension");

        let completed = f
            .scheduler
            .find_by_field("status", AppointmentStatus::Completed)
            .unwrap();
        assert!(completed.is_empty());
        f.scheduler.update_status(id, AppointmentStatus::Completed).unwrap();
        assert_eq!(
            f.scheduler
                .find_by_field_text("status", "completed")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn reads_hand_back_detached_copies() {
        let f = fixture();
        let when = now() + Duration::days(1);
        let booked = f
            .scheduler
            .schedule(&f.p1, &f.cardiologist, &f.card_101, when, cost("150000.00"))
            .unwrap();
        let id = booked.id().unwrap();

        let mut copy = f.scheduler.find_by_id(id).unwrap().unwrap();
        copy.set_status(AppointmentStatus::Cancelled);
        copy.set_notes("edited outside the scheduler");
        copy.assign_id(EntityId(7));
        for mut other in f.scheduler.find_all().unwrap() {
            other.set_status(AppointmentStatus::Completed);
        }

        let stored = f.scheduler.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored, booked);
        assert!(f.scheduler.find_by_id(EntityId(7)).unwrap().is_none());
        assert_eq!(f.scheduler.find_by_field_text("cost", "150000").unwrap(), vec![booked]);
        assert!(matches!(
            f.scheduler.find_by_field_text("cost", "a lot"),
            Err(StoreError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn updating_unknown_appointment_fails() {
        let f = fixture();
        let err = f
            .scheduler
            .update_status(EntityId(5), AppointmentStatus::Cancelled)
            .unwrap_err();
        assert_eq!(err, SchedulingError::UnknownAppointment(EntityId(5)));
    }
}

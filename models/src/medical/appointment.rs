// models/src/medical/appointment.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, FieldAccessors};
use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::EntityId;
use crate::properties::FieldKind;

/// Life cycle of an appointment:
/// `Scheduled -> InProgress -> Completed`, with `Cancelled` reachable from
/// `Scheduled` and `InProgress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn code(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed and cancelled appointments go nowhere.
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    /// Whether the life cycle allows moving from `self` to `next`. No-op
    /// and backward moves are not allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Completed)
                | (InProgress, Completed)
                | (Scheduled, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownCode {
                kind: "appointment status",
                code: s.to_string(),
            })
    }
}

/// A booked appointment. Everything but `status` and `notes` is fixed at
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    id: Option<EntityId>,
    patient_id: EntityId,
    practitioner_id: EntityId,
    room_id: EntityId,
    scheduled_at: DateTime<Utc>,
    cost: Decimal,
    status: AppointmentStatus,
    notes: String,
}

impl Appointment {
    /// Builds an appointment in `Scheduled` state without checking any
    /// scheduling rule. Bookings should go through the scheduler, which
    /// validates the request and detects conflicts first.
    pub fn new(
        patient_id: EntityId,
        practitioner_id: EntityId,
        room_id: EntityId,
        scheduled_at: DateTime<Utc>,
        cost: Decimal,
    ) -> Self {
        Appointment {
            id: None,
            patient_id,
            practitioner_id,
            room_id,
            scheduled_at,
            cost,
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
        }
    }

    pub fn patient_id(&self) -> EntityId {
        self.patient_id
    }

    pub fn practitioner_id(&self) -> EntityId {
        self.practitioner_id
    }

    pub fn room_id(&self) -> EntityId {
        self.room_id
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Overwrites the status without consulting the life cycle.
    pub fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
    }

    /// Moves to `next` if the life cycle allows it.
    pub fn transition_to(&mut self, next: AppointmentStatus) -> ValidationResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(ValidationError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }
}

static APPOINTMENT_FIELDS: Lazy<FieldAccessors<Appointment>> = Lazy::new(|| {
    FieldAccessors::<Appointment>::new("Appointment")
        .field("id", FieldKind::Integer, |a| a.id.into())
        .field("patient_id", FieldKind::Integer, |a| a.patient_id.into())
        .field("practitioner_id", FieldKind::Integer, |a| a.practitioner_id.into())
        .field("room_id", FieldKind::Integer, |a| a.room_id.into())
        .field("scheduled_at", FieldKind::DateTime, |a| a.scheduled_at.into())
        .field("cost", FieldKind::Decimal, |a| a.cost.into())
        .field("status", FieldKind::Status, |a| a.status.into())
        .field("notes", FieldKind::String, |a| (&a.notes).into())
});

impl Entity for Appointment {
    const ENTITY_NAME: &'static str = "Appointment";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field_accessors() -> &'static FieldAccessors<Self> {
        &APPOINTMENT_FIELDS
    }
}

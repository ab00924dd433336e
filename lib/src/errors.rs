// lib/src/errors.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use hospital_models::medical::Specialty;
use hospital_models::EntityId;

/// Failures of an `EntityStore`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} has no field named '{field}'")]
    FieldNotFound { entity: &'static str, field: String },

    #[error("{entity}.{field}: {reason}")]
    InvalidFieldValue {
        entity: &'static str,
        field: String,
        reason: hospital_models::ValidationError,
    },

    #[error("{entity} has no identity; insert it before updating it")]
    MissingIdentity { entity: &'static str },

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Why a booking request was rejected. Every variant carries what a caller
/// needs to explain the rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("appointment time {requested} is not in the future (now is {now})")]
    PastDate {
        requested: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("appointment cost cannot be negative: {0}")]
    NegativeCost(Decimal),

    #[error("practitioner specialty {practitioner} does not match room specialty {room}")]
    IncompatibleSpecialty {
        practitioner: Specialty,
        room: Specialty,
    },

    #[error("practitioner #{practitioner_id} already has appointment #{conflicting} at {at}")]
    PractitionerConflict {
        practitioner_id: EntityId,
        at: DateTime<Utc>,
        conflicting: EntityId,
    },

    #[error("room #{room_id} is already booked by appointment #{conflicting} at {at}")]
    RoomConflict {
        room_id: EntityId,
        at: DateTime<Utc>,
        conflicting: EntityId,
    },

    #[error("appointment #{0} not found")]
    UnknownAppointment(EntityId),

    #[error(transparent)]
    Transition(#[from] hospital_models::ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SchedulingResult<T> = std::result::Result<T, SchedulingError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StoreError::LockError(err.to_string())
    }
}

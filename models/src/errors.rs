// models/src/errors.rs

pub use thiserror::Error;

use crate::medical::AppointmentStatus;

/// A validation error raised by the record factories.
///
/// Factories never hand back a half-built value: either every intrinsic
/// field checks out and the record is returned, or one of these describes
/// the first field that did not.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// A required text field was empty or only whitespace.
    #[error("{0} must not be empty")]
    BlankField(&'static str),
    /// A field was present but its format is not acceptable.
    #[error("{field} has an invalid format: '{value}'")]
    InvalidFormat { field: &'static str, value: String },
    /// Raw text could not be read as a value of the expected kind.
    #[error("'{value}' is not a valid {kind}")]
    InvalidValue { kind: &'static str, value: String },
    /// An identifier is invalid (e.g., malformed string).
    #[error("identifier '{0}' is invalid")]
    InvalidIdentifier(String),
    /// An identifier has an invalid length.
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    /// The record has not been stored yet, so it has no identity to link by.
    #[error("{0} has no identity; store it before linking it")]
    MissingIdentity(&'static str),
    /// A department index does not exist in the owning hospital.
    #[error("department #{0} does not exist")]
    UnknownDepartment(usize),
    /// A department with the same name is already part of the hospital.
    #[error("department '{0}' already exists")]
    DuplicateDepartment(String),
    /// A code could not be parsed into one of the closed enumerations.
    #[error("unknown {kind} code '{code}'")]
    UnknownCode { kind: &'static str, code: String },
    /// A status change that the appointment life cycle does not allow.
    #[error("appointment cannot move from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(value: impl Into<String>, field: &'static str) -> ValidationResult<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

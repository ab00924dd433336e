// models/src/properties.rs
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::EntityId;
use crate::medical::{AppointmentStatus, BloodType, Specialty};

/// The value of a single entity field, as seen by field queries and by the
/// display layer.
///
/// Equality never crosses variants: `Integer(1)` is not equal to
/// `String("1")`, which is what keeps a value of the wrong kind from matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    Null,
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Specialty(Specialty),
    BloodType(BloodType),
    Status(AppointmentStatus),
}

impl PropertyValue {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::String(_) => "string",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Decimal(_) => "decimal",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Date(_) => "date",
            PropertyValue::DateTime(_) => "datetime",
            PropertyValue::Specialty(_) => "specialty",
            PropertyValue::BloodType(_) => "blood_type",
            PropertyValue::Status(_) => "status",
        }
    }
}

/// The kind of value a registered field holds. Raw query text is parsed
/// against it, so `12345678` stays text for a national id and becomes a
/// decimal for a cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Specialty,
    BloodType,
    Status,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Specialty => "specialty",
            FieldKind::BloodType => "blood_type",
            FieldKind::Status => "status",
        }
    }

    /// Parses `raw` as a value of this kind. `null` reads as an absent value
    /// for every kind except `String`, where it is ordinary text.
    pub fn parse(self, raw: &str) -> ValidationResult<PropertyValue> {
        let raw = raw.trim();
        if self != FieldKind::String && raw.eq_ignore_ascii_case("null") {
            return Ok(PropertyValue::Null);
        }
        let invalid = || ValidationError::InvalidValue {
            kind: self.name(),
            value: raw.to_string(),
        };
        let value = match self {
            FieldKind::String => PropertyValue::String(raw.to_string()),
            FieldKind::Integer => PropertyValue::Integer(raw.parse().map_err(|_| invalid())?),
            FieldKind::Decimal => PropertyValue::Decimal(Decimal::from_str(raw).map_err(|_| invalid())?),
            FieldKind::Boolean => PropertyValue::Boolean(raw.parse().map_err(|_| invalid())?),
            FieldKind::Date => PropertyValue::Date(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?,
            ),
            FieldKind::DateTime => PropertyValue::DateTime(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| invalid())?
                    .with_timezone(&Utc),
            ),
            FieldKind::Specialty => PropertyValue::Specialty(Specialty::from_str(raw)?),
            FieldKind::BloodType => PropertyValue::BloodType(BloodType::from_str(raw)?),
            FieldKind::Status => PropertyValue::Status(AppointmentStatus::from_str(raw)?),
        };
        Ok(value)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "-"),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Decimal(d) => write!(f, "{}", d),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PropertyValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            PropertyValue::Specialty(s) => write!(f, "{}", s),
            PropertyValue::BloodType(b) => write!(f, "{}", b),
            PropertyValue::Status(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for PropertyValue { fn from(s: String) -> Self { PropertyValue::String(s) } }
impl From<&str> for PropertyValue { fn from(s: &str) -> Self { PropertyValue::String(s.to_string()) } }
impl From<&String> for PropertyValue { fn from(s: &String) -> Self { PropertyValue::String(s.clone()) } }
impl From<i64> for PropertyValue { fn from(i: i64) -> Self { PropertyValue::Integer(i) } }
impl From<Decimal> for PropertyValue { fn from(d: Decimal) -> Self { PropertyValue::Decimal(d) } }
impl From<bool> for PropertyValue { fn from(b: bool) -> Self { PropertyValue::Boolean(b) } }
impl From<NaiveDate> for PropertyValue { fn from(d: NaiveDate) -> Self { PropertyValue::Date(d) } }
impl From<DateTime<Utc>> for PropertyValue { fn from(dt: DateTime<Utc>) -> Self { PropertyValue::DateTime(dt) } }
impl From<Specialty> for PropertyValue { fn from(s: Specialty) -> Self { PropertyValue::Specialty(s) } }
impl From<BloodType> for PropertyValue { fn from(b: BloodType) -> Self { PropertyValue::BloodType(b) } }
impl From<AppointmentStatus> for PropertyValue { fn from(s: AppointmentStatus) -> Self { PropertyValue::Status(s) } }

// Identities are compared as integers so `--value 3` finds `patient_id = 3`.
impl From<EntityId> for PropertyValue {
    fn from(id: EntityId) -> Self {
        PropertyValue::Integer(i64::try_from(id.value()).unwrap_or(i64::MAX))
    }
}

impl<T> From<Option<T>> for PropertyValue
where
    T: Into<PropertyValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

/// Field name to value, ordered by name. What the display layer renders.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

// models/src/identifiers.rs

use core::ops::Deref;
use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use internment::Intern;

use crate::errors::{ValidationError, ValidationResult};

/// An identifier. Identifiers are short interned strings (255 bytes max)
/// that name a schema object such as an entity field. Interning makes the
/// comparisons in field lookups pointer-cheap.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Identifier(pub Intern<String>);

impl Identifier {
    /// Creates a new identifier.
    ///
    /// # Arguments
    /// * `value`: The identifier value. The value must be between 1 and 255
    /// bytes in length (inclusive) and must not contain whitespace.
    ///
    /// # Errors
    /// Returns a `ValidationError` if the length is out of range or the
    /// value contains whitespace.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() || value.len() > u8::MAX as usize {
            return Err(ValidationError::InvalidIdentifierLength);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidIdentifier(value));
        }

        Ok(Self(Intern::new(value)))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0.to_string()
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.as_str().cmp(other.0.as_str())
    }
}

/// The identity a store stamps on a record at insertion time.
///
/// Identities start at 1 within each store and are never reissued.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId(value)
    }
}

/// Stable index of a department inside the hospital that owns it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DepartmentId(pub usize);

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// models/src/medical/person.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{require_text, ValidationError, ValidationResult};
use crate::medical::BloodType;

/// Personal data shared by practitioners and patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    first_name: String,
    last_name: String,
    national_id: String,
    date_of_birth: NaiveDate,
    blood_type: BloodType,
}

impl PersonInfo {
    /// Validates and builds the shared personal data.
    ///
    /// Names and national id must be non-blank; the national id must be made
    /// of ASCII digits only.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
        date_of_birth: NaiveDate,
        blood_type: BloodType,
    ) -> ValidationResult<Self> {
        let first_name = require_text(first_name, "first name")?;
        let last_name = require_text(last_name, "last name")?;
        let national_id = require_text(national_id, "national id")?;
        if !national_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "national id",
                value: national_id,
            });
        }

        Ok(PersonInfo {
            first_name,
            last_name,
            national_id,
            date_of_birth,
            blood_type,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    /// Age in whole years on `today`. Zero for dates before birth.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let born = self.date_of_birth;
        if today < born {
            return 0;
        }
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builds_valid_person() {
        let p = PersonInfo::new("Carlos", "Gonzalez", "12345678", date(1975, 5, 15), BloodType::APositive)
            .unwrap();
        assert_eq!(p.full_name(), "Carlos Gonzalez");
        assert_eq!(p.national_id(), "12345678");
    }

    #[test]
    fn rejects_blank_names() {
        let err = PersonInfo::new(" ", "Gonzalez", "12345678", date(1975, 5, 15), BloodType::APositive)
            .unwrap_err();
        assert_eq!(err, ValidationError::BlankField("first name"));
    }

    #[test]
    fn rejects_non_numeric_national_id() {
        let err = PersonInfo::new("Ana", "Martinez", "23A56789", date(1980, 8, 22), BloodType::ONegative)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "national id", .. }));
    }

    #[test]
    fn age_counts_completed_years() {
        let p = PersonInfo::new("Leila", "Cruz", "46063438", date(1985, 12, 5), BloodType::APositive)
            .unwrap();
        assert_eq!(p.age_on(date(2025, 12, 4)), 39);
        assert_eq!(p.age_on(date(2025, 12, 5)), 40);
        assert_eq!(p.age_on(date(1980, 1, 1)), 0);
    }
}

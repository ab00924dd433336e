// models/src/medical/specialty.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Medical specialty of a practitioner, and the specialty affinity of a
/// department and its rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    Cardiology,
    Pediatrics,
    Traumatology,
    Neurology,
    Dermatology,
    Gynecology,
    Oncology,
    Ophthalmology,
    GeneralMedicine,
}

impl Specialty {
    pub const ALL: [Specialty; 9] = [
        Specialty::Cardiology,
        Specialty::Pediatrics,
        Specialty::Traumatology,
        Specialty::Neurology,
        Specialty::Dermatology,
        Specialty::Gynecology,
        Specialty::Oncology,
        Specialty::Ophthalmology,
        Specialty::GeneralMedicine,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Specialty::Cardiology => "CARDIOLOGY",
            Specialty::Pediatrics => "PEDIATRICS",
            Specialty::Traumatology => "TRAUMATOLOGY",
            Specialty::Neurology => "NEUROLOGY",
            Specialty::Dermatology => "DERMATOLOGY",
            Specialty::Gynecology => "GYNECOLOGY",
            Specialty::Oncology => "ONCOLOGY",
            Specialty::Ophthalmology => "OPHTHALMOLOGY",
            Specialty::GeneralMedicine => "GENERAL_MEDICINE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Specialty::Cardiology => "Cardiology",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Traumatology => "Traumatology",
            Specialty::Neurology => "Neurology",
            Specialty::Dermatology => "Dermatology",
            Specialty::Gynecology => "Gynecology",
            Specialty::Oncology => "Oncology",
            Specialty::Ophthalmology => "Ophthalmology",
            Specialty::GeneralMedicine => "General medicine",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for Specialty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialty::ALL
            .into_iter()
            .find(|specialty| specialty.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownCode {
                kind: "specialty",
                code: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("CARDIOLOGY".parse::<Specialty>().unwrap(), Specialty::Cardiology);
        assert_eq!("general_medicine".parse::<Specialty>().unwrap(), Specialty::GeneralMedicine);
        assert!("DENTISTRY".parse::<Specialty>().is_err());
    }

    #[test]
    fn codes_round_trip_through_serde() {
        let json = serde_json::to_string(&Specialty::Traumatology).unwrap();
        assert_eq!(json, "\"TRAUMATOLOGY\"");
    }
}

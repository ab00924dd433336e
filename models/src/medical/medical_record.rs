// models/src/medical/medical_record.rs
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A patient's clinical record. Entries can be appended, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    record_number: String,
    created_at: DateTime<Utc>,
    diagnoses: Vec<String>,
    treatments: Vec<String>,
    allergies: Vec<String>,
}

impl ClinicalRecord {
    /// Opens a record for the patient with `national_id`. The record number
    /// is `HC-<national id>-<year opened>`.
    pub fn open(national_id: &str, created_at: DateTime<Utc>) -> Self {
        ClinicalRecord {
            record_number: format!("HC-{}-{}", national_id, created_at.year()),
            created_at,
            diagnoses: Vec::new(),
            treatments: Vec::new(),
            allergies: Vec::new(),
        }
    }

    pub fn record_number(&self) -> &str {
        &self.record_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn diagnoses(&self) -> &[String] {
        &self.diagnoses
    }

    pub fn treatments(&self) -> &[String] {
        &self.treatments
    }

    pub fn allergies(&self) -> &[String] {
        &self.allergies
    }

    // Blank entries are dropped silently.
    pub fn add_diagnosis(&mut self, diagnosis: impl Into<String>) {
        push_non_blank(&mut self.diagnoses, diagnosis.into());
    }

    pub fn add_treatment(&mut self, treatment: impl Into<String>) {
        push_non_blank(&mut self.treatments, treatment.into());
    }

    pub fn add_allergy(&mut self, allergy: impl Into<String>) {
        push_non_blank(&mut self.allergies, allergy.into());
    }
}

fn push_non_blank(list: &mut Vec<String>, entry: String) {
    let entry = entry.trim();
    if !entry.is_empty() {
        list.push(entry.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_number_uses_national_id_and_year() {
        let opened = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let record = ClinicalRecord::open("46063438", opened);
        assert_eq!(record.record_number(), "HC-46063438-2025");
        assert_eq!(record.created_at(), opened);
    }

    #[test]
    fn entries_are_appended_in_order_and_blanks_ignored() {
        let mut record = ClinicalRecord::open("1", Utc::now());
        record.add_diagnosis("Hypertension");
        record.add_diagnosis("   ");
        record.add_diagnosis("Arrhythmia");
        record.add_treatment("Enalapril 10mg");
        record.add_allergy("");
        assert_eq!(record.diagnoses(), ["Hypertension", "Arrhythmia"]);
        assert_eq!(record.treatments(), ["Enalapril 10mg"]);
        assert!(record.allergies().is_empty());
    }
}

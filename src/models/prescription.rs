use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::PrescriptionStatus;
use super::validate::{self, Validate};
use super::wire_date;
use crate::api::Resource;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "patientId")]
    pub patient_id: String,
    #[serde(default, alias = "patientName")]
    pub patient_name: Option<String>,
    #[serde(alias = "doctorId")]
    pub doctor_id: String,
    #[serde(default, alias = "doctorName")]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub medications: Vec<PrescribedMedication>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub status: PrescriptionStatus,
    #[serde(default, alias = "issuedDate", with = "wire_date::option")]
    pub issued_date: Option<NaiveDate>,
}

impl Prescription {
    /// Comma-separated medication names for table cells.
    pub fn medication_summary(&self) -> String {
        self.medications
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionCreate {
    pub patient_id: String,
    pub doctor_id: String,
    pub medications: Vec<PrescribedMedication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default = "active")]
    pub status: PrescriptionStatus,
}

fn active() -> PrescriptionStatus {
    PrescriptionStatus::Active
}

impl Validate for PrescriptionCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("patient_id", &self.patient_id)?;
        validate::require_text("doctor_id", &self.doctor_id)?;
        if self.medications.is_empty() {
            return Err(ClientError::validation("medications", "at least one medication is required"));
        }
        for med in &self.medications {
            validate::require_text("medications.name", &med.name)?;
            validate::require_text("medications.dosage", &med.dosage)?;
            validate::require_text("medications.frequency", &med.frequency)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrescriptionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PrescriptionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<PrescribedMedication>>,
}

impl Validate for PrescriptionUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        if let Some(meds) = &self.medications {
            if meds.is_empty() {
                return Err(ClientError::validation("medications", "must not be emptied"));
            }
        }
        Ok(())
    }
}

impl Resource for Prescription {
    const PATH: &'static str = "prescriptions";
    const LABEL: &'static str = "Prescription";
    type Create = PrescriptionCreate;
    type Update = PrescriptionUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_joins_names() {
        let p: Prescription = serde_json::from_value(json!({
            "_id": "rx1",
            "patientId": "p",
            "doctorId": "d",
            "status": "active",
            "medications": [
                {"name": "Amoxicillin", "dosage": "500mg", "frequency": "tid"},
                {"name": "Ibuprofen", "dosage": "200mg", "frequency": "prn"}
            ]
        }))
        .unwrap();
        assert_eq!(p.medication_summary(), "Amoxicillin, Ibuprofen");
    }

    #[test]
    fn create_needs_a_medication() {
        let create = PrescriptionCreate {
            patient_id: "p".into(),
            doctor_id: "d".into(),
            medications: vec![],
            diagnosis: None,
            instructions: None,
            status: PrescriptionStatus::Active,
        };
        assert!(create.validate().is_err());
    }
}

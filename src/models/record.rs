use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, Validate};
use super::wire_date;
use crate::api::Resource;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "patientId")]
    pub patient_id: String,
    #[serde(default, alias = "patientName")]
    pub patient_name: Option<String>,
    #[serde(default, alias = "doctorId")]
    pub doctor_id: Option<String>,
    #[serde(default, alias = "doctorName")]
    pub doctor_name: Option<String>,
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(
        default,
        rename = "nextAppointmentDate",
        alias = "next_appointment_date",
        with = "wire_date::option"
    )]
    pub next_appointment_date: Option<NaiveDate>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Wire payload for creating a record. An absent follow-up date is omitted
/// from the body entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecordCreate {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub diagnosis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        rename = "nextAppointmentDate",
        skip_serializing_if = "Option::is_none",
        with = "wire_date::option"
    )]
    pub next_appointment_date: Option<NaiveDate>,
}

impl Validate for MedicalRecordCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("patient_id", &self.patient_id)?;
        validate::require_text("diagnosis", &self.diagnosis)
    }
}

/// Record form contents as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct MedicalRecordDraft {
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
    pub next_appointment_date: Option<String>,
}

impl MedicalRecordDraft {
    /// Build the create payload. A follow-up date that does not parse is
    /// dropped rather than sent as an invalid date.
    pub fn into_payload(self) -> MedicalRecordCreate {
        let next_appointment_date = match self.next_appointment_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed = wire_date::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(value = raw, "Dropping unparseable nextAppointmentDate");
                }
                parsed
            }
        };

        MedicalRecordCreate {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id.filter(|d| !d.trim().is_empty()),
            diagnosis: self.diagnosis,
            symptoms: non_blank(self.symptoms),
            treatment: non_blank(self.treatment),
            notes: non_blank(self.notes),
            next_appointment_date,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalRecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        rename = "nextAppointmentDate",
        skip_serializing_if = "Option::is_none",
        with = "wire_date::option"
    )]
    pub next_appointment_date: Option<NaiveDate>,
}

impl Validate for MedicalRecordUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_optional_text("diagnosis", self.diagnosis.as_deref())
    }
}

impl Resource for MedicalRecord {
    const PATH: &'static str = "medical-records";
    const LABEL: &'static str = "Medical record";
    type Create = MedicalRecordCreate;
    type Update = MedicalRecordUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, Validate};
use super::wire_date;
use crate::api::Resource;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "dateOfBirth", with = "wire_date::option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "bloodGroup")]
    pub blood_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default, alias = "specialty")]
    pub specialization: Option<String>,
    #[serde(default, alias = "licenseNumber")]
    pub license_number: Option<String>,
    #[serde(default, alias = "consultationFee")]
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacist {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default, alias = "pharmacyName")]
    pub pharmacy_name: Option<String>,
    #[serde(default, alias = "licenseNumber")]
    pub license_number: Option<String>,
}

/// Create payload shared by the three person resources.
///
/// Role-specific fields are ignored by routes that do not know them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonCreate {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date::option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacy_name: Option<String>,
}

impl Validate for PersonCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("name", &self.name)?;
        validate::require_email("email", &self.email)?;
        validate::require_optional_text("phone", self.phone.as_deref())?;
        if let Some(fee) = self.consultation_fee {
            validate::require_non_negative("consultation_fee", fee)?;
        }
        Ok(())
    }
}

/// Partial update for a person resource. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacy_name: Option<String>,
}

impl Validate for PersonUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_optional_text("name", self.name.as_deref())?;
        if let Some(email) = &self.email {
            validate::require_email("email", email)?;
        }
        if let Some(fee) = self.consultation_fee {
            validate::require_non_negative("consultation_fee", fee)?;
        }
        Ok(())
    }
}

impl Resource for Patient {
    const PATH: &'static str = "patients";
    const LABEL: &'static str = "Patient";
    type Create = PersonCreate;
    type Update = PersonUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Doctor {
    const PATH: &'static str = "doctors";
    const LABEL: &'static str = "Doctor";
    type Create = PersonCreate;
    type Update = PersonUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Pharmacist {
    const PATH: &'static str = "pharmacists";
    const LABEL: &'static str = "Pharmacist";
    type Create = PersonCreate;
    type Update = PersonUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

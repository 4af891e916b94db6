use serde::{Deserialize, Serialize};

use super::enums::OrderStatus;
use super::validate::{self, Validate};
use crate::api::Resource;
use crate::error::ClientError;

/// Pharmacy order.
///
/// The pharmacy is carried in the doctor-shaped fields the backend uses
/// for it (`doctor_id`, `doctor_name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyOrder {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "patientId")]
    pub patient_id: String,
    #[serde(default, alias = "patientName")]
    pub patient_name: Option<String>,
    #[serde(default, alias = "doctorId", alias = "pharmacy_id")]
    pub doctor_id: Option<String>,
    #[serde(default, alias = "doctorName", alias = "pharmacy_name")]
    pub doctor_name: Option<String>,
    #[serde(alias = "medicineId")]
    pub medicine_id: String,
    #[serde(default, alias = "medicineName")]
    pub medicine_name: Option<String>,
    pub quantity: u32,
    pub status: OrderStatus,
    #[serde(alias = "totalAmount")]
    pub total_amount: f64,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl PharmacyOrder {
    pub fn pharmacy_name(&self) -> Option<&str> {
        self.doctor_name.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub medicine_id: String,
    pub quantity: u32,
    pub total_amount: f64,
    #[serde(default = "pending")]
    pub status: OrderStatus,
}

fn pending() -> OrderStatus {
    OrderStatus::Pending
}

impl Validate for OrderCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("patient_id", &self.patient_id)?;
        validate::require_text("medicine_id", &self.medicine_id)?;
        if self.quantity == 0 {
            return Err(ClientError::validation("quantity", "must be at least 1"));
        }
        validate::require_positive("total_amount", self.total_amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Validate for OrderUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        if self.quantity == Some(0) {
            return Err(ClientError::validation("quantity", "must be at least 1"));
        }
        if let Some(amount) = self.total_amount {
            validate::require_positive("total_amount", amount)?;
        }
        Ok(())
    }
}

impl Resource for PharmacyOrder {
    const PATH: &'static str = "pharmacy-orders";
    const LABEL: &'static str = "Order";
    type Create = OrderCreate;
    type Update = OrderUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
pub(crate) fn sample_order(id: &str, status: OrderStatus) -> PharmacyOrder {
    PharmacyOrder {
        id: id.to_string(),
        patient_id: "pat-1".into(),
        patient_name: Some("Ada Obi".into()),
        doctor_id: Some("pharm-9".into()),
        doctor_name: Some("Green Cross Pharmacy".into()),
        medicine_id: "med-3".into(),
        medicine_name: Some("Amoxicillin".into()),
        quantity: 2,
        status,
        total_amount: 3000.0,
        created_at: None,
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{self, Validate};
use super::wire_date;
use crate::api::Resource;
use crate::error::ClientError;

/// Stock level at or below which a medicine shows up as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default, alias = "stockQuantity", alias = "stock")]
    pub stock_quantity: u32,
    #[serde(default, alias = "expiryDate", with = "wire_date::option")]
    pub expiry_date: Option<NaiveDate>,
}

impl Medicine {
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= LOW_STOCK_THRESHOLD
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date::option")]
    pub expiry_date: Option<NaiveDate>,
}

impl Validate for MedicineCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("name", &self.name)?;
        validate::require_positive("price", self.price)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicineUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date::option")]
    pub expiry_date: Option<NaiveDate>,
}

impl Validate for MedicineUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_optional_text("name", self.name.as_deref())?;
        if let Some(price) = self.price {
            validate::require_positive("price", price)?;
        }
        Ok(())
    }
}

impl Resource for Medicine {
    const PATH: &'static str = "medicines";
    const LABEL: &'static str = "Medicine";
    type Create = MedicineCreate;
    type Update = MedicineUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

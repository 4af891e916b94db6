use serde::{Deserialize, Serialize};

use super::enums::{PaymentStatus, PaymentType};
use super::validate::{self, Validate};
use crate::api::Resource;
use crate::error::ClientError;

/// A payment as listed by the backend. Payer details are stored on the
/// payment itself, not only by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    pub amount: f64,
    #[serde(rename = "type", alias = "payment_type")]
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    #[serde(default, alias = "paystackReference")]
    pub reference: Option<String>,
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(default, alias = "appointmentId")]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Body of `POST /payments/initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInit {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub return_url: String,
}

impl Validate for PaymentInit {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("fullName", &self.full_name)?;
        validate::require_email("email", &self.email)?;
        validate::require_text("phoneNumber", &self.phone_number)?;
        validate::require_positive("amount", self.amount)?;
        validate::require_text("returnUrl", &self.return_url)?;
        match self.payment_type {
            PaymentType::Order if self.order_id.is_none() => {
                Err(ClientError::validation("orderId", "is required for order payments"))
            }
            PaymentType::Appointment if self.appointment_id.is_none() => Err(
                ClientError::validation("appointmentId", "is required for appointment payments"),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaystackData {
    #[serde(default)]
    authorization_url: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

/// Response of `POST /payments/initialize`.
///
/// Newer backends nest the gateway data under `paystack_data`; older ones
/// return a flat `paystackAuthorizationUrl`.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentInitResponse {
    #[serde(default)]
    paystack_data: Option<PaystackData>,
    #[serde(default, rename = "paystackAuthorizationUrl")]
    legacy_authorization_url: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

impl PaymentInitResponse {
    /// Gateway checkout URL, preferring the nested field.
    pub fn authorization_url(&self) -> Option<&str> {
        self.paystack_data
            .as_ref()
            .and_then(|d| d.authorization_url.as_deref())
            .or(self.legacy_authorization_url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn reference(&self) -> Option<&str> {
        self.paystack_data
            .as_ref()
            .and_then(|d| d.reference.as_deref())
            .or(self.reference.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for PaymentUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_optional_text("notes", self.notes.as_deref())
    }
}

impl Resource for Payment {
    const PATH: &'static str = "payments";
    const LABEL: &'static str = "Payment";
    type Create = PaymentInit;
    type Update = PaymentUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init() -> PaymentInit {
        PaymentInit {
            full_name: "Ada Obi".into(),
            email: "ada@example.org".into(),
            phone_number: "0800".into(),
            amount: 3000.0,
            payment_type: PaymentType::Order,
            order_id: Some("o1".into()),
            appointment_id: None,
            notes: String::new(),
            return_url: "https://app.example/patient/orders".into(),
        }
    }

    #[test]
    fn init_payload_is_camel_case() {
        let body = serde_json::to_value(init()).unwrap();
        assert_eq!(
            body,
            json!({
                "fullName": "Ada Obi",
                "email": "ada@example.org",
                "phoneNumber": "0800",
                "amount": 3000.0,
                "type": "order",
                "orderId": "o1",
                "notes": "",
                "returnUrl": "https://app.example/patient/orders"
            })
        );
    }

    #[test]
    fn order_payment_requires_order_id() {
        let mut payload = init();
        payload.order_id = None;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn nested_url_wins_over_legacy() {
        let resp: PaymentInitResponse = serde_json::from_value(json!({
            "paystack_data": {"authorization_url": "https://checkout/new", "reference": "r1"},
            "paystackAuthorizationUrl": "https://checkout/old"
        }))
        .unwrap();
        assert_eq!(resp.authorization_url(), Some("https://checkout/new"));
        assert_eq!(resp.reference(), Some("r1"));
    }

    #[test]
    fn legacy_url_is_accepted() {
        let resp: PaymentInitResponse =
            serde_json::from_value(json!({"paystackAuthorizationUrl": "https://checkout/old"}))
                .unwrap();
        assert_eq!(resp.authorization_url(), Some("https://checkout/old"));
    }

    #[test]
    fn missing_or_blank_url_is_none() {
        let resp: PaymentInitResponse =
            serde_json::from_value(json!({"paystack_data": {"authorization_url": ""}})).unwrap();
        assert_eq!(resp.authorization_url(), None);
        let resp: PaymentInitResponse = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert_eq!(resp.authorization_url(), None);
    }

    #[test]
    fn payment_list_row_decodes() {
        let p: Payment = serde_json::from_value(json!({
            "_id": "pay1",
            "fullName": "Ada Obi",
            "email": "ada@example.org",
            "amount": 500,
            "type": "appointment",
            "status": "success",
            "reference": "T123"
        }))
        .unwrap();
        assert_eq!(p.payment_type, PaymentType::Appointment);
        assert_eq!(p.status, PaymentStatus::Success);
    }
}

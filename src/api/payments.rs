use super::client::{item_path, ApiClient};
use crate::error::ClientError;
use crate::models::page::decode_item;
use crate::models::{Payment, PaymentInit, PaymentInitResponse, Validate};

impl ApiClient {
    /// `POST /payments/initialize`: register the payment and get the
    /// gateway checkout link back.
    pub async fn initialize_payment(&self, payload: &PaymentInit) -> Result<PaymentInitResponse, ClientError> {
        payload.validate()?;
        let value = self.post_json("payments/initialize", payload).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /payments/verify/{reference}`: the backend's view of a
    /// gateway transaction after the user came back from checkout.
    pub async fn verify_payment(&self, reference: &str) -> Result<Payment, ClientError> {
        let value = self.get_json(&item_path("payments/verify", reference)?, &[]).await?;
        Ok(decode_item(value)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::models::{PaymentStatus, Role};
    use crate::session::{test_user, Session};
    use crate::test_support::{StubResponse, StubServer};
    use serde_json::json;

    #[tokio::test]
    async fn verify_reads_payment_row() {
        let server = StubServer::start(vec![StubResponse::ok(
            "GET",
            "/payments/verify/T-77",
            json!({"data": {
                "_id": "pay1", "fullName": "Ada", "email": "ada@example.org",
                "amount": 3000, "type": "order", "status": "success", "reference": "T-77"
            }}),
        )])
        .await;
        let client = ApiClient::new(
            ClientConfig::new(&server.base_url),
            Arc::new(Session::with_user(test_user(Role::Patient, "t"))),
        )
        .unwrap();

        let payment = client.verify_payment("T-77").await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
    }
}

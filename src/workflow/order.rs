//! Pharmacy order cancellation. Cancelling is a `status` PATCH; payment
//! lives in `workflow::payment` and never touches order status.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::interaction::{Confirm, Notifier};
use crate::models::{OrderStatus, OrderUpdate, PharmacyOrder};

pub fn can_cancel_order(order: &PharmacyOrder) -> bool {
    !order.status.is_closed()
}

pub struct OrderWorkflow {
    client: Arc<ApiClient>,
    confirm: Arc<dyn Confirm>,
    notifier: Notifier,
}

impl OrderWorkflow {
    pub fn new(client: Arc<ApiClient>, confirm: Arc<dyn Confirm>, notifier: Notifier) -> Self {
        Self {
            client,
            confirm,
            notifier,
        }
    }

    /// Cancel after confirmation. `Ok(false)` when the user declined.
    pub async fn cancel(&self, order: &PharmacyOrder) -> Result<bool, ClientError> {
        if !can_cancel_order(order) {
            return Err(ClientError::ActionDisabled("order is completed or cancelled"));
        }
        if !self.confirm.confirm("Are you sure you want to cancel this order?") {
            return Ok(false);
        }

        let update = OrderUpdate::status(OrderStatus::Cancelled);
        match self.client.update::<PharmacyOrder>(&order.id, &update).await {
            Ok(_) => {
                tracing::info!(order_id = %order.id, "Order cancelled");
                self.notifier.success("Order cancelled");
                Ok(true)
            }
            Err(err) => {
                self.notifier.failure("cancel order", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::interaction::{notifier, NotificationLevel, NotificationReceiver};
    use crate::models::{sample_order, Role};
    use crate::session::{test_user, Session};
    use crate::test_support::{ScriptedConfirm, StubResponse, StubServer};
    use serde_json::json;

    async fn harness(
        responses: Vec<StubResponse>,
        answer: bool,
    ) -> (StubServer, OrderWorkflow, Arc<ScriptedConfirm>, NotificationReceiver) {
        let server = StubServer::start(responses).await;
        let client = Arc::new(
            ApiClient::new(
                ClientConfig::new(&server.base_url),
                Arc::new(Session::with_user(test_user(Role::Patient, "tok"))),
            )
            .unwrap(),
        );
        let confirm = Arc::new(ScriptedConfirm::new(answer));
        let (tx, rx) = notifier();
        let workflow = OrderWorkflow::new(client, confirm.clone(), tx);
        (server, workflow, confirm, rx)
    }

    #[test]
    fn only_open_orders_can_be_cancelled() {
        for status in OrderStatus::ALL {
            let order = sample_order("o1", *status);
            assert_eq!(can_cancel_order(&order), !status.is_closed(), "{status}");
        }
    }

    #[tokio::test]
    async fn confirmed_cancel_patches_status() {
        let (server, workflow, confirm, mut notes) = harness(
            vec![StubResponse::ok("PATCH", "/pharmacy-orders/o1", json!({"message": "ok"}))],
            true,
        )
        .await;
        let order = sample_order("o1", OrderStatus::Pending);

        assert!(workflow.cancel(&order).await.unwrap());
        assert_eq!(confirm.times_asked(), 1);
        assert_eq!(server.hits("PATCH", "/pharmacy-orders/o1"), 1);
        assert_eq!(server.requests()[0].json(), json!({"status": "cancelled"}));

        let notes = notes.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn declined_cancel_sends_nothing() {
        let (server, workflow, confirm, mut notes) = harness(vec![], false).await;
        let order = sample_order("o1", OrderStatus::Processing);

        assert!(!workflow.cancel(&order).await.unwrap());
        assert_eq!(confirm.times_asked(), 1);
        assert!(server.requests().is_empty());
        assert!(notes.drain().is_empty());
    }

    #[tokio::test]
    async fn closed_order_is_refused_without_asking() {
        let (server, workflow, confirm, _notes) = harness(vec![], true).await;
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            let err = workflow.cancel(&sample_order("o1", status)).await.unwrap_err();
            assert!(matches!(err, ClientError::ActionDisabled(_)), "{status}");
        }
        assert_eq!(confirm.times_asked(), 0);
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let (_server, workflow, _confirm, mut notes) = harness(
            vec![StubResponse::text("PATCH", "/pharmacy-orders/o1", 409, "Order already shipped")],
            true,
        )
        .await;
        let order = sample_order("o1", OrderStatus::Processing);

        assert!(workflow.cancel(&order).await.is_err());
        let notes = notes.drain();
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert!(notes[0].message.contains("Order already shipped"));
    }
}

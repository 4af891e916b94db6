//! Generic list/create/update/delete over every backend resource.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::{item_path, ApiClient};
use crate::error::ClientError;
use crate::models::page::{decode_item, decode_list};
use crate::models::{ListQuery, Page, Validate};

/// A backend collection reachable at `/{PATH}`.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const PATH: &'static str;
    /// Singular display name ("Appointment").
    const LABEL: &'static str;
    type Create: Serialize + DeserializeOwned + Validate + Send + Sync;
    type Update: Serialize + DeserializeOwned + Validate + Send + Sync;

    fn id(&self) -> &str;
}

impl ApiClient {
    /// `GET /{resource}?page&limit&search`.
    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, ClientError> {
        let value = self.get_json(R::PATH, &query.to_query_pairs()).await?;
        let page = decode_list(value)?;
        tracing::debug!(resource = R::PATH, rows = page.items.len(), total = page.total, "Listed");
        Ok(page)
    }

    /// The whole collection, for tables that page in memory.
    pub async fn fetch_all<R: Resource>(&self) -> Result<Vec<R>, ClientError> {
        let value = self.get_json(R::PATH, &[]).await?;
        Ok(decode_list::<R>(value)?.items)
    }

    pub async fn get<R: Resource>(&self, id: &str) -> Result<R, ClientError> {
        let value = self.get_json(&item_path(R::PATH, id)?, &[]).await?;
        Ok(decode_item(value)?)
    }

    /// `POST /{resource}`. Returns the created row when the backend echoes it.
    pub async fn create<R: Resource>(&self, payload: &R::Create) -> Result<Option<R>, ClientError> {
        payload.validate()?;
        let value = self.post_json(R::PATH, payload).await?;
        tracing::info!(resource = R::PATH, "Created");
        Ok(echoed(value))
    }

    /// `PATCH /{resource}/{id}`.
    pub async fn update<R: Resource>(&self, id: &str, payload: &R::Update) -> Result<Option<R>, ClientError> {
        payload.validate()?;
        let value = self.patch_json(&item_path(R::PATH, id)?, payload).await?;
        tracing::info!(resource = R::PATH, id, "Updated");
        Ok(echoed(value))
    }

    /// `DELETE /{resource}/{id}`.
    pub async fn delete<R: Resource>(&self, id: &str) -> Result<(), ClientError> {
        self.delete_path(&item_path(R::PATH, id)?).await?;
        tracing::info!(resource = R::PATH, id, "Deleted");
        Ok(())
    }
}

/// Mutation responses vary (`{message}`, `{data: row}`, the bare row);
/// only a decodable row is surfaced.
fn echoed<R: Resource>(value: serde_json::Value) -> Option<R> {
    if value.is_null() {
        return None;
    }
    decode_item(value).ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::models::{
        Appointment, AppointmentStatus, AppointmentUpdate, Medicine, MedicineCreate, Prescription, Role,
    };
    use crate::session::{test_user, Session};
    use crate::test_support::{StubResponse, StubServer};
    use serde_json::json;

    async fn setup(responses: Vec<StubResponse>) -> (StubServer, ApiClient) {
        let server = StubServer::start(responses).await;
        let client = ApiClient::new(
            ClientConfig::new(&server.base_url),
            Arc::new(Session::with_user(test_user(Role::Admin, "t"))),
        )
        .unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn list_sends_page_limit_search() {
        let (server, client) = setup(vec![StubResponse::ok(
            "GET",
            "/medicines",
            json!({"data": [{"_id": "m1", "name": "Zinc", "price": 200}], "total": 31}),
        )])
        .await;

        let page: Page<Medicine> = client
            .list(&ListQuery::new(2, 10).with_search("zinc"))
            .await
            .unwrap();
        assert_eq!(page.total, 31);
        assert_eq!(page.page_count(10), 4);

        let req = &server.requests()[0];
        assert_eq!(req.query_param("page").as_deref(), Some("3"));
        assert_eq!(req.query_param("limit").as_deref(), Some("10"));
        assert_eq!(req.query_param("search").as_deref(), Some("zinc"));
    }

    #[tokio::test]
    async fn list_accepts_bare_array_resources() {
        let (_server, client) = setup(vec![StubResponse::ok(
            "GET",
            "/prescriptions",
            json!([{"_id": "rx", "patient_id": "p", "doctor_id": "d", "status": "active"}]),
        )])
        .await;
        let page: Page<Prescription> = client.list(&ListQuery::new(0, 10)).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn invalid_payload_is_not_sent() {
        let (server, client) = setup(vec![]).await;
        let bad = MedicineCreate {
            name: "".into(),
            description: None,
            manufacturer: None,
            category: None,
            price: 10.0,
            stock_quantity: 1,
            expiry_date: None,
        };
        let err = client.create::<Medicine>(&bad).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn update_patches_item_path() {
        let (server, client) = setup(vec![StubResponse::ok(
            "PATCH",
            "/appointments/a1",
            json!({"message": "updated"}),
        )])
        .await;

        let echoed = client
            .update::<Appointment>("a1", &AppointmentUpdate::status(AppointmentStatus::Confirmed))
            .await
            .unwrap();
        assert!(echoed.is_none());
        assert_eq!(server.hits("PATCH", "/appointments/a1"), 1);
        assert_eq!(server.requests()[0].json(), json!({"status": "confirmed"}));
    }

    #[tokio::test]
    async fn delete_hits_item_path() {
        let (server, client) = setup(vec![StubResponse::ok("DELETE", "/medicines/m9", json!({}))]).await;
        client.delete::<Medicine>("m9").await.unwrap();
        assert_eq!(server.hits("DELETE", "/medicines/m9"), 1);
    }

    #[tokio::test]
    async fn get_unwraps_data_envelope() {
        let (_server, client) = setup(vec![StubResponse::ok(
            "GET",
            "/medicines/m1",
            json!({"data": {"_id": "m1", "name": "Zinc", "price": 200}}),
        )])
        .await;
        let med: Medicine = client.get("m1").await.unwrap();
        assert_eq!(med.name, "Zinc");
    }
}

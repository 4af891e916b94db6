use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ClientError;

/// Links the backend returns after attaching a video meeting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeetingLinks {
    /// Host start link.
    #[serde(default)]
    pub admin_url: Option<String>,
    /// Participant join link.
    #[serde(default)]
    pub user_url: Option<String>,
    #[serde(default, rename = "zoomMeetingId", alias = "meeting_id")]
    pub meeting_id: Option<String>,
}

#[derive(Deserialize)]
struct AttachMeetingResponse {
    #[serde(default)]
    data: Option<MeetingLinks>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachMeetingRequest<'a> {
    appointment_id: &'a str,
}

impl ApiClient {
    /// `POST /zoom/add-meeting`: create (or fetch) the meeting for an
    /// appointment. Expects `{data: {admin_url, ...}}`.
    pub async fn attach_meeting(&self, appointment_id: &str) -> Result<MeetingLinks, ClientError> {
        let request = AttachMeetingRequest { appointment_id };
        let value = self.post_json("zoom/add-meeting", &request).await?;
        let response: AttachMeetingResponse = serde_json::from_value(value)?;
        let links = response.data.ok_or(ClientError::MissingField("data"))?;
        tracing::info!(appointment_id, has_host_link = links.admin_url.is_some(), "Meeting attached");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::models::Role;
    use crate::session::{test_user, Session};
    use crate::test_support::{StubResponse, StubServer};
    use serde_json::json;

    #[tokio::test]
    async fn sends_appointment_id_and_reads_links() {
        let server = StubServer::start(vec![StubResponse::ok(
            "POST",
            "/zoom/add-meeting",
            json!({"data": {"admin_url": "https://zoom.us/s/1", "user_url": "https://zoom.us/j/1", "zoomMeetingId": "1"}}),
        )])
        .await;
        let client = ApiClient::new(
            ClientConfig::new(&server.base_url),
            Arc::new(Session::with_user(test_user(Role::Doctor, "t"))),
        )
        .unwrap();

        let links = client.attach_meeting("a1").await.unwrap();
        assert_eq!(links.admin_url.as_deref(), Some("https://zoom.us/s/1"));
        assert_eq!(links.meeting_id.as_deref(), Some("1"));
        assert_eq!(server.requests()[0].json(), json!({"appointmentId": "a1"}));
    }

    #[tokio::test]
    async fn missing_data_is_an_error() {
        let server = StubServer::start(vec![StubResponse::ok(
            "POST",
            "/zoom/add-meeting",
            json!({"message": "created"}),
        )])
        .await;
        let client = ApiClient::new(
            ClientConfig::new(&server.base_url),
            Arc::new(Session::with_user(test_user(Role::Doctor, "t"))),
        )
        .unwrap();
        assert!(matches!(
            client.attach_meeting("a1").await,
            Err(ClientError::MissingField("data"))
        ));
    }
}

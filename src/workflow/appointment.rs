//! Appointment lifecycle: status changes, cancellation, booking, and the
//! "Join Meeting" action.
//!
//! Status changes are plain PATCHes of the `status` field. The backend
//! owns the rules; the client only offers the usual next steps and disables
//! actions on terminal appointments.
//!
//! Joining resolves a link in three tiers:
//! 1. `admin_url` already on the appointment: open it
//! 2. only `zoomMeetingId`: open `{meeting_join_base}/{id}`
//! 3. neither: ask the backend to attach a meeting, open `data.admin_url`
//!
//! Any failure in that chain ends in the same "contact support" message.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Url;

use crate::api::ApiClient;
use crate::error::{ClientError, MEETING_SUPPORT_MESSAGE};
use crate::inflight::InFlight;
use crate::interaction::{parse_external_url, Confirm, Notifier, UrlOpener};
use crate::models::{
    Appointment, AppointmentCreate, AppointmentPriority, AppointmentStatus, AppointmentUpdate, Role,
};

// ─── Pure rules ───────────────────────────────────────────────────────────────

/// Usual next states offered as quick actions.
///
/// The status dropdown still allows any value; this only drives the
/// buttons shown next to a row.
pub fn suggested_transitions(status: AppointmentStatus) -> &'static [AppointmentStatus] {
    use AppointmentStatus::*;
    match status {
        Scheduled => &[Confirmed, Cancelled, Rescheduled],
        Confirmed => &[Completed, Cancelled, NoShow],
        Completed | Cancelled | NoShow | Rescheduled => &[],
    }
}

pub fn can_join(appointment: &Appointment) -> bool {
    !appointment.status.is_terminal()
}

pub fn can_cancel(appointment: &Appointment) -> bool {
    appointment.status != AppointmentStatus::Cancelled
}

/// Where a join link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingTarget {
    HostLink,
    MeetingId,
    Attached,
}

/// Link resolvable without a network call (tiers 1 and 2).
pub fn known_meeting_link(
    appointment: &Appointment,
    join_base: &str,
) -> Option<(MeetingTarget, String)> {
    if let Some(url) = appointment.host_link() {
        return Some((MeetingTarget::HostLink, url.to_string()));
    }
    appointment.meeting_id().map(|id| {
        let id: String = id.chars().filter(|c| !c.is_whitespace()).collect();
        (
            MeetingTarget::MeetingId,
            format!("{}/{}", join_base.trim_end_matches('/'), id),
        )
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub target: MeetingTarget,
    pub url: Url,
}

/// What a patient fills in to book.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
    /// `HH:MM`.
    pub time: String,
    pub reason: String,
    pub notes: Option<String>,
    pub priority: AppointmentPriority,
    pub duration: u32,
}

// ─── Workflow ────────────────────────────────────────────────────────────────

pub struct AppointmentWorkflow {
    client: Arc<ApiClient>,
    opener: Arc<dyn UrlOpener>,
    confirm: Arc<dyn Confirm>,
    notifier: Notifier,
    joining: InFlight,
}

impl AppointmentWorkflow {
    pub fn new(
        client: Arc<ApiClient>,
        opener: Arc<dyn UrlOpener>,
        confirm: Arc<dyn Confirm>,
        notifier: Notifier,
    ) -> Self {
        Self {
            client,
            opener,
            confirm,
            notifier,
            joining: InFlight::new(),
        }
    }

    /// Whether a join is running right now (button spinner).
    pub fn is_joining(&self) -> bool {
        self.joining.is_busy()
    }

    /// Open the meeting for an appointment, attaching one if needed.
    pub async fn join_meeting(&self, appointment: &Appointment) -> Result<JoinOutcome, ClientError> {
        if !can_join(appointment) {
            return Err(ClientError::ActionDisabled("appointment is completed or cancelled"));
        }
        let Some(_guard) = self.joining.try_acquire() else {
            return Err(ClientError::Busy);
        };

        match self.resolve_and_open(appointment).await {
            Ok(outcome) => {
                tracing::info!(appointment_id = %appointment.id, link_source = ?outcome.target, "Opened meeting");
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(appointment_id = %appointment.id, error = %err, "Join meeting failed");
                self.notifier.error(MEETING_SUPPORT_MESSAGE);
                Err(match err {
                    ClientError::MeetingUnavailable(_) => err,
                    other => ClientError::MeetingUnavailable(other.to_string()),
                })
            }
        }
    }

    async fn resolve_and_open(&self, appointment: &Appointment) -> Result<JoinOutcome, ClientError> {
        let join_base = &self.client.config().meeting_join_base;
        let (target, raw) = match known_meeting_link(appointment, join_base) {
            Some(found) => found,
            None => {
                let links = self.client.attach_meeting(&appointment.id).await?;
                let host = links
                    .admin_url
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(ClientError::MeetingUnavailable(
                        "response has no data.admin_url".into(),
                    ))?;
                (MeetingTarget::Attached, host)
            }
        };

        let url = parse_external_url(&raw)?;
        self.opener.open(&url)?;
        Ok(JoinOutcome { target, url })
    }

    /// Write any status to an appointment.
    pub async fn update_status(&self, appointment_id: &str, status: AppointmentStatus) -> Result<(), ClientError> {
        let result = self
            .client
            .update::<Appointment>(appointment_id, &AppointmentUpdate::status(status))
            .await;
        match result {
            Ok(_) => {
                self.notifier.success(format!("Appointment marked {}", status.as_str().replace('_', " ")));
                Ok(())
            }
            Err(err) => {
                self.notifier.failure("update appointment status", &err);
                Err(err)
            }
        }
    }

    /// Move an appointment to `to`, logging when it is not a usual step.
    pub async fn transition(&self, appointment: &Appointment, to: AppointmentStatus) -> Result<(), ClientError> {
        if !suggested_transitions(appointment.status).contains(&to) {
            tracing::debug!(
                appointment_id = %appointment.id,
                from = %appointment.status,
                to = %to,
                "Unusual status change"
            );
        }
        self.update_status(&appointment.id, to).await
    }

    /// Cancel after confirmation. `Ok(false)` when the user declined.
    pub async fn cancel(&self, appointment: &Appointment) -> Result<bool, ClientError> {
        if !can_cancel(appointment) {
            return Err(ClientError::ActionDisabled("appointment is already cancelled"));
        }
        if !self.confirm.confirm("Are you sure you want to cancel this appointment?") {
            return Ok(false);
        }
        self.update_status(&appointment.id, AppointmentStatus::Cancelled).await?;
        Ok(true)
    }

    /// New date/time plus `rescheduled` status in one PATCH.
    pub async fn reschedule(&self, appointment: &Appointment, date: NaiveDate, time: &str) -> Result<(), ClientError> {
        if appointment.status.is_terminal() {
            return Err(ClientError::ActionDisabled("appointment is completed or cancelled"));
        }
        let update = AppointmentUpdate {
            status: Some(AppointmentStatus::Rescheduled),
            appointment_date: Some(date),
            appointment_time: Some(time.trim().to_string()),
            ..Default::default()
        };
        match self.client.update::<Appointment>(&appointment.id, &update).await {
            Ok(_) => {
                self.notifier.success("Appointment rescheduled");
                Ok(())
            }
            Err(err) => {
                self.notifier.failure("reschedule appointment", &err);
                Err(err)
            }
        }
    }

    /// Book an appointment for the signed-in patient.
    pub async fn book(&self, request: BookingRequest) -> Result<Option<Appointment>, ClientError> {
        let session = self.client.session();
        let patient = match session.current_user() {
            Some(user) if user.role == Role::Patient => user,
            Some(_) => return Err(ClientError::ActionDisabled("only patients can book appointments")),
            None => {
                let err = ClientError::NotAuthenticated;
                self.notifier.failure("book appointment", &err);
                return Err(err);
            }
        };

        let payload = AppointmentCreate {
            patient_id: patient.id,
            doctor_id: request.doctor_id,
            appointment_date: request.date,
            appointment_time: request.time.trim().to_string(),
            reason: request.reason.trim().to_string(),
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            priority: request.priority,
            duration: request.duration,
            status: AppointmentStatus::Scheduled,
        };

        match self.client.create::<Appointment>(&payload).await {
            Ok(created) => {
                self.notifier.success("Appointment booked");
                Ok(created)
            }
            Err(err) => {
                self.notifier.failure("book appointment", &err);
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
    use crate::models::sample_appointment;
    use crate::session::{test_user, Session};
    use crate::test_support::{RecordingOpener, ScriptedConfirm, StubResponse, StubServer};
    use serde_json::json;

    struct Harness {
        server: StubServer,
        workflow: AppointmentWorkflow,
        opener: Arc<RecordingOpener>,
        confirm: Arc<ScriptedConfirm>,
        notifications: NotificationReceiver,
    }

    async fn harness(responses: Vec<StubResponse>, role: Role, confirm_answer: bool) -> Harness {
        let server = StubServer::start(responses).await;
        let config = ClientConfig::new(&server.base_url).with_meeting_join_base("https://zoom.us/j/");
        let client = Arc::new(
            ApiClient::new(config, Arc::new(Session::with_user(test_user(role, "tok")))).unwrap(),
        );
        let opener = Arc::new(RecordingOpener::default());
        let confirm = Arc::new(ScriptedConfirm::new(confirm_answer));
        let (tx, rx) = notifier();
        let workflow = AppointmentWorkflow::new(client, opener.clone(), confirm.clone(), tx);
        Harness {
            server,
            workflow,
            opener,
            confirm,
            notifications: rx,
        }
    }

    #[test]
    fn transitions_from_scheduled_and_confirmed() {
        use AppointmentStatus::*;
        assert_eq!(suggested_transitions(Scheduled), &[Confirmed, Cancelled, Rescheduled]);
        assert_eq!(suggested_transitions(Confirmed), &[Completed, Cancelled, NoShow]);
        assert!(suggested_transitions(Completed).is_empty());
    }

    #[test]
    fn join_and_cancel_availability() {
        for status in AppointmentStatus::ALL {
            let appt = sample_appointment("a", *status);
            let terminal = matches!(status, AppointmentStatus::Completed | AppointmentStatus::Cancelled);
            assert_eq!(can_join(&appt), !terminal, "{status}");
            assert_eq!(can_cancel(&appt), *status != AppointmentStatus::Cancelled, "{status}");
        }
    }

    #[test]
    fn meeting_id_builds_join_url() {
        let mut appt = sample_appointment("a", AppointmentStatus::Confirmed);
        appt.zoom_meeting_id = Some("123 456 789".into());
        assert_eq!(
            known_meeting_link(&appt, "https://zoom.us/j/"),
            Some((MeetingTarget::MeetingId, "https://zoom.us/j/123456789".to_string()))
        );
    }

    #[tokio::test]
    async fn terminal_appointments_never_call_meeting_api() {
        let mut h = harness(vec![], Role::Doctor, true).await;
        for status in [AppointmentStatus::Cancelled, AppointmentStatus::Completed] {
            let appt = sample_appointment("a1", status);
            let err = h.workflow.join_meeting(&appt).await.unwrap_err();
            assert!(matches!(err, ClientError::ActionDisabled(_)));
        }
        assert!(h.server.requests().is_empty());
        assert!(h.opener.opened().is_empty());
        assert!(h.notifications.drain().is_empty());
    }

    #[tokio::test]
    async fn existing_host_link_opens_directly() {
        let h = harness(vec![], Role::Doctor, true).await;
        let mut appt = sample_appointment("a1", AppointmentStatus::Confirmed);
        appt.admin_url = Some("https://zoom.us/s/42?zak=abc".into());
        appt.zoom_meeting_id = Some("42".into());

        let outcome = h.workflow.join_meeting(&appt).await.unwrap();
        assert_eq!(outcome.target, MeetingTarget::HostLink);
        assert_eq!(h.opener.opened(), vec!["https://zoom.us/s/42?zak=abc".to_string()]);
        assert_eq!(h.server.hits("POST", "/zoom/add-meeting"), 0);
    }

    #[tokio::test]
    async fn meeting_id_only_opens_join_link_without_api() {
        let h = harness(vec![], Role::Patient, true).await;
        let mut appt = sample_appointment("a1", AppointmentStatus::Scheduled);
        appt.zoom_meeting_id = Some("987".into());

        let outcome = h.workflow.join_meeting(&appt).await.unwrap();
        assert_eq!(outcome.target, MeetingTarget::MeetingId);
        assert_eq!(outcome.url.as_str(), "https://zoom.us/j/987");
        assert!(h.server.requests().is_empty());
    }

    #[tokio::test]
    async fn no_links_attaches_meeting_once() {
        let h = harness(
            vec![StubResponse::ok(
                "POST",
                "/zoom/add-meeting",
                json!({"data": {"admin_url": "https://zoom.us/s/55"}}),
            )],
            Role::Doctor,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Confirmed);

        let outcome = h.workflow.join_meeting(&appt).await.unwrap();
        assert_eq!(outcome.target, MeetingTarget::Attached);
        assert_eq!(h.server.hits("POST", "/zoom/add-meeting"), 1);
        assert_eq!(h.opener.opened(), vec!["https://zoom.us/s/55".to_string()]);
    }

    #[tokio::test]
    async fn attach_without_admin_url_shows_support_alert() {
        let mut h = harness(
            vec![StubResponse::ok(
                "POST",
                "/zoom/add-meeting",
                json!({"data": {"user_url": "https://zoom.us/j/55"}}),
            )],
            Role::Doctor,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Scheduled);

        let err = h.workflow.join_meeting(&appt).await.unwrap_err();
        assert!(matches!(err, ClientError::MeetingUnavailable(_)));
        assert_eq!(h.server.hits("POST", "/zoom/add-meeting"), 1);
        assert!(h.opener.opened().is_empty());

        let notes = h.notifications.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].message, MEETING_SUPPORT_MESSAGE);
        assert!(!h.workflow.is_joining());
    }

    #[tokio::test]
    async fn attach_http_failure_collapses_to_same_alert() {
        let mut h = harness(
            vec![StubResponse::text("POST", "/zoom/add-meeting", 500, "zoom down")],
            Role::Doctor,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Confirmed);
        assert!(h.workflow.join_meeting(&appt).await.is_err());
        assert_eq!(h.notifications.drain()[0].message, MEETING_SUPPORT_MESSAGE);
    }

    #[tokio::test]
    async fn cancel_confirms_then_patches_status() {
        let mut h = harness(
            vec![StubResponse::ok("PATCH", "/appointments/a1", json!({"message": "ok"}))],
            Role::Patient,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Scheduled);

        assert!(h.workflow.cancel(&appt).await.unwrap());
        assert_eq!(h.confirm.times_asked(), 1);
        assert_eq!(h.server.requests()[0].json(), json!({"status": "cancelled"}));
        assert_eq!(h.notifications.drain()[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn declined_cancel_sends_nothing() {
        let h = harness(vec![], Role::Patient, false).await;
        let appt = sample_appointment("a1", AppointmentStatus::Scheduled);
        assert!(!h.workflow.cancel(&appt).await.unwrap());
        assert!(h.server.requests().is_empty());
    }

    #[tokio::test]
    async fn cancel_is_disabled_once_cancelled() {
        let h = harness(vec![], Role::Patient, true).await;
        let appt = sample_appointment("a1", AppointmentStatus::Cancelled);
        assert!(matches!(
            h.workflow.cancel(&appt).await,
            Err(ClientError::ActionDisabled(_))
        ));
        assert_eq!(h.confirm.times_asked(), 0);
    }

    #[tokio::test]
    async fn any_status_can_be_written() {
        let h = harness(
            vec![StubResponse::ok("PATCH", "/appointments/a1", json!({}))],
            Role::Admin,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Completed);
        h.workflow
            .transition(&appt, AppointmentStatus::Scheduled)
            .await
            .unwrap();
        assert_eq!(h.server.requests()[0].json(), json!({"status": "scheduled"}));
    }

    #[tokio::test]
    async fn reschedule_sends_date_time_and_status() {
        let h = harness(
            vec![StubResponse::ok("PATCH", "/appointments/a1", json!({}))],
            Role::Doctor,
            true,
        )
        .await;
        let appt = sample_appointment("a1", AppointmentStatus::Confirmed);
        let date = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
        h.workflow.reschedule(&appt, date, "14:30").await.unwrap();
        assert_eq!(
            h.server.requests()[0].json(),
            json!({"status": "rescheduled", "appointment_date": "2026-11-03", "appointment_time": "14:30"})
        );
    }

    #[tokio::test]
    async fn patient_books_with_own_id() {
        let h = harness(
            vec![StubResponse::ok("POST", "/appointments", json!({"message": "created"}))],
            Role::Patient,
            true,
        )
        .await;
        let request = BookingRequest {
            doctor_id: "doc-7".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(),
            time: "09:15".into(),
            reason: "Headache".into(),
            notes: Some("  ".into()),
            priority: AppointmentPriority::High,
            duration: 30,
        };
        h.workflow.book(request).await.unwrap();

        let body = h.server.requests()[0].json();
        assert_eq!(body["patient_id"], "patient-1");
        assert_eq!(body["doctor_id"], "doc-7");
        assert_eq!(body["status"], "scheduled");
        assert!(body.get("notes").is_none());
    }

    #[tokio::test]
    async fn doctors_cannot_book() {
        let h = harness(vec![], Role::Doctor, true).await;
        let request = BookingRequest {
            doctor_id: "doc-7".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(),
            time: "09:15".into(),
            reason: "Headache".into(),
            notes: None,
            priority: AppointmentPriority::Normal,
            duration: 30,
        };
        assert!(matches!(
            h.workflow.book(request).await,
            Err(ClientError::ActionDisabled(_))
        ));
        assert!(h.server.requests().is_empty());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AppointmentPriority, AppointmentStatus};
use super::validate::{self, Validate};
use super::wire_date;
use crate::api::Resource;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "patientId")]
    pub patient_id: String,
    #[serde(default, alias = "patientName")]
    pub patient_name: Option<String>,
    #[serde(alias = "doctorId")]
    pub doctor_id: String,
    #[serde(default, alias = "doctorName")]
    pub doctor_name: Option<String>,
    /// `None` when the backend sent no date or one that does not parse.
    #[serde(default, alias = "appointmentDate", with = "wire_date::option")]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default, alias = "appointmentTime")]
    pub appointment_time: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: AppointmentPriority,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, rename = "zoomMeetingId", alias = "zoom_meeting_id")]
    pub zoom_meeting_id: Option<String>,
    #[serde(default)]
    pub user_url: Option<String>,
    #[serde(default)]
    pub admin_url: Option<String>,
}

impl Appointment {
    /// Non-empty host start link, if the meeting was already attached.
    pub fn host_link(&self) -> Option<&str> {
        self.admin_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn meeting_id(&self) -> Option<&str> {
        self.zoom_meeting_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn has_meeting(&self) -> bool {
        self.host_link().is_some() || self.meeting_id().is_some()
    }
}

/// Booking payload. New appointments always start `scheduled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(with = "wire_date")]
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: AppointmentPriority,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "scheduled")]
    pub status: AppointmentStatus,
}

fn default_duration() -> u32 {
    30
}

fn scheduled() -> AppointmentStatus {
    AppointmentStatus::Scheduled
}

impl Validate for AppointmentCreate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("patient_id", &self.patient_id)?;
        validate::require_text("doctor_id", &self.doctor_id)?;
        validate::require_text("reason", &self.reason)?;
        validate::require_time_of_day("appointment_time", &self.appointment_time)?;
        if !(5..=480).contains(&self.duration) {
            return Err(ClientError::validation("duration", "must be between 5 and 480 minutes"));
        }
        if self.status != AppointmentStatus::Scheduled {
            return Err(ClientError::validation("status", "new appointments must be scheduled"));
        }
        Ok(())
    }
}

/// Partial update; status changes go through this with only `status` set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "wire_date::option")]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<AppointmentPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl AppointmentUpdate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Validate for AppointmentUpdate {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_optional_text("reason", self.reason.as_deref())?;
        if let Some(time) = &self.appointment_time {
            validate::require_time_of_day("appointment_time", time)?;
        }
        if let Some(duration) = self.duration {
            if !(5..=480).contains(&duration) {
                return Err(ClientError::validation("duration", "must be between 5 and 480 minutes"));
            }
        }
        Ok(())
    }
}

impl Resource for Appointment {
    const PATH: &'static str = "appointments";
    const LABEL: &'static str = "Appointment";
    type Create = AppointmentCreate;
    type Update = AppointmentUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
pub(crate) fn sample_appointment(id: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: "pat-1".into(),
        patient_name: Some("Ada Obi".into()),
        doctor_id: "doc-1".into(),
        doctor_name: Some("Dr. Bello".into()),
        appointment_date: NaiveDate::from_ymd_opt(2026, 10, 20),
        appointment_time: Some("10:00".into()),
        status,
        reason: "Follow-up".into(),
        notes: None,
        priority: AppointmentPriority::Normal,
        duration: Some(30),
        zoom_meeting_id: None,
        user_url: None,
        admin_url: None,
    }
}

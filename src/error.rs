//! Client-side error taxonomy.
//!
//! Every failure a screen can run into collapses into `ClientError`. The
//! view layer shows `user_message()` as a single-line notification; the
//! full `Display` text goes to the log.

use thiserror::Error;

/// Shown whenever a meeting link cannot be produced.
pub const MEETING_SUPPORT_MESSAGE: &str =
    "Unable to start the meeting for this appointment. Please contact support.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not authenticated: no session token")]
    NotAuthenticated,

    #[error("Backend is not reachable at {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Backend returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Another request for this action is still in flight")]
    Busy,

    #[error("No payment URL returned")]
    NoPaymentUrl,

    #[error("Meeting link unavailable: {0}")]
    MeetingUnavailable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Action not available: {0}")]
    ActionDisabled(&'static str),
}

impl ClientError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// One-line text for a toast or alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "You are not logged in. Please log in and try again.".into(),
            Self::Network(_) | Self::Timeout => {
                "Could not reach the server. Check your connection and try again.".into()
            }
            Self::Http { body, status } => {
                if body.trim().is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    body.clone()
                }
            }
            Self::MalformedResponse(_) | Self::MissingField(_) | Self::InvalidEnum { .. } => {
                "The server returned an unexpected response.".into()
            }
            Self::Validation { field, reason } => format!("{field}: {reason}"),
            Self::Busy => "Please wait, the previous request is still running.".into(),
            Self::NoPaymentUrl => "No payment URL returned".into(),
            Self::MeetingUnavailable(_) => MEETING_SUPPORT_MESSAGE.into(),
            Self::InvalidUrl(_) => "The link returned by the server is not valid.".into(),
            Self::ActionDisabled(reason) => format!("This action is not available: {reason}"),
        }
    }

    /// Whether the backend rejected the token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Http { status: 401, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Network(
                err.url()
                    .map(|u| u.origin().ascii_serialization())
                    .unwrap_or_else(|| err.to_string()),
            )
        } else if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}

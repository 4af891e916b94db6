//! Runtime checks applied to outgoing payloads before they hit the wire.

use crate::error::ClientError;

/// Payload that can check itself before it is sent.
pub trait Validate {
    fn validate(&self) -> Result<(), ClientError>;
}

impl Validate for serde_json::Value {
    fn validate(&self) -> Result<(), ClientError> {
        if self.is_object() {
            Ok(())
        } else {
            Err(ClientError::validation("payload", "must be a JSON object"))
        }
    }
}

pub fn require_text(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(field, "is required"));
    }
    Ok(())
}

pub fn require_optional_text(field: &str, value: Option<&str>) -> Result<(), ClientError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ClientError::validation(field, "must not be blank")),
        _ => Ok(()),
    }
}

pub fn require_positive(field: &str, value: f64) -> Result<(), ClientError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ClientError::validation(field, "must be greater than zero"));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: f64) -> Result<(), ClientError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientError::validation(field, "must not be negative"));
    }
    Ok(())
}

pub fn require_email(field: &str, value: &str) -> Result<(), ClientError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(ClientError::validation(field, "must be a valid email address"));
    }
    Ok(())
}

/// `HH:MM` on a 24-hour clock.
pub fn require_time_of_day(field: &str, value: &str) -> Result<(), ClientError> {
    if chrono::NaiveTime::parse_from_str(value.trim(), "%H:%M").is_err() {
        return Err(ClientError::validation(field, "must be a time in HH:MM format"));
    }
    Ok(())
}

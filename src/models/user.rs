use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::validate::{self, Validate};
use crate::error::ClientError;

/// The signed-in account, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber", alias = "phone_number")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_email("email", &self.email)?;
        validate::require_text("password", &self.password)
    }
}

/// Login response: the token sits next to or inside the user object.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default, alias = "accessToken", alias = "access_token")]
    pub token: Option<String>,
    #[serde(alias = "data")]
    pub user: AuthUser,
}

impl LoginResponse {
    pub fn into_user(self) -> Result<AuthUser, ClientError> {
        let mut user = self.user;
        if let Some(token) = self.token {
            user.token = token;
        }
        if user.token.trim().is_empty() {
            return Err(ClientError::MissingField("token"));
        }
        Ok(user)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ClientError> {
        validate::require_text("name", &self.name)?;
        validate::require_email("email", &self.email)?;
        if self.password.chars().count() < 8 {
            return Err(ClientError::validation("password", "must be at least 8 characters"));
        }
        validate::require_optional_text("phone", self.phone.as_deref())?;
        if self.role == Role::Admin {
            return Err(ClientError::validation("role", "admin accounts cannot self-register"));
        }
        Ok(())
    }
}

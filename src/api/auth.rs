use super::client::ApiClient;
use crate::error::ClientError;
use crate::models::page::decode_item;
use crate::models::user::LoginResponse;
use crate::models::{AuthUser, LoginRequest, RegisterRequest, Validate};

impl ApiClient {
    /// `POST /auth/login`; on success the user becomes the session user.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ClientError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let value = self.post_public("auth/login", &request).await?;
        let user = serde_json::from_value::<LoginResponse>(value)?.into_user()?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    /// `POST /auth/register`. Does not sign the new account in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        request.validate()?;
        self.post_public("auth/register", request).await?;
        tracing::info!(role = %request.role, "Account registered");
        Ok(())
    }

    /// `GET /auth/me`: refresh the profile behind the current token.
    pub async fn me(&self) -> Result<AuthUser, ClientError> {
        let token = self.session().token()?;
        let value = self.get_json("auth/me", &[]).await?;
        let mut user: AuthUser = decode_item(value)?;
        user.token = token;
        self.session().set_user(user.clone());
        Ok(user)
    }

    pub fn logout(&self) {
        self.session().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::models::Role;
    use crate::session::Session;
    use crate::test_support::{StubResponse, StubServer};
    use serde_json::json;

    #[tokio::test]
    async fn login_populates_session() {
        let server = StubServer::start(vec![StubResponse::ok(
            "POST",
            "/auth/login",
            json!({
                "token": "jwt-1",
                "user": {"_id": "u1", "name": "Ada", "email": "ada@example.org", "role": "patient"}
            }),
        )])
        .await;
        let session = Arc::new(Session::new());
        let client = ApiClient::new(ClientConfig::new(&server.base_url), session.clone()).unwrap();

        let user = client.login("ada@example.org", "pw").await.unwrap();
        assert_eq!(user.role, Role::Patient);
        assert_eq!(session.token().unwrap(), "jwt-1");
        // Login is sent without a bearer header.
        assert!(server.requests()[0].authorization.is_none());

        client.logout();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_empty() {
        let server = StubServer::start(vec![StubResponse::text(
            "POST",
            "/auth/login",
            401,
            "Invalid credentials",
        )])
        .await;
        let session = Arc::new(Session::new());
        let client = ApiClient::new(ClientConfig::new(&server.base_url), session.clone()).unwrap();

        let err = client.login("ada@example.org", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn register_validates_before_sending() {
        let server = StubServer::start(vec![]).await;
        let client =
            ApiClient::new(ClientConfig::new(&server.base_url), Arc::new(Session::new())).unwrap();
        let request = RegisterRequest {
            name: "Ada".into(),
            email: "bad".into(),
            password: "longpassword".into(),
            phone: None,
            role: Role::Patient,
        };
        assert!(client.register(&request).await.is_err());
        assert!(server.requests().is_empty());
    }
}

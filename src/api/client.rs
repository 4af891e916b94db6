use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Session;

/// HTTP client bound to one backend and one session.
pub struct ApiClient {
    config: ClientConfig,
    session: Arc<Session>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Network(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            config,
            session,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        self.send(Method::GET, path, query, None, true).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(&body), true).await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, path, &[], Some(&body), true).await
    }

    pub async fn delete_path(&self, path: &str) -> Result<Value, ClientError> {
        self.send(Method::DELETE, path, &[], None, true).await
    }

    /// POST without a bearer token (login, registration).
    pub(crate) async fn post_public<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(&body), false).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Value, ClientError> {
        // Token is resolved before any I/O so a signed-out user never hits the network.
        let token = if authenticated {
            Some(self.session.token()?)
        } else {
            None
        };

        let url = self.config.endpoint(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "Sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ClientError::from)?;

        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "Backend rejected request");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Response is not JSON");
            ClientError::MalformedResponse(e.to_string())
        })
    }
}

/// `{resource}/{id}`, refusing ids that would escape the resource path.
pub(crate) fn item_path(resource: &str, id: &str) -> Result<String, ClientError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id == "." || id == ".." {
        return Err(ClientError::validation("id", format!("invalid identifier `{id}`")));
    }
    Ok(format!("{resource}/{id}"))
}

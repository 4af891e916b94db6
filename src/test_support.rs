//! In-process HTTP stub backend and recording fakes for tests.
//!
//! The stub binds `127.0.0.1:0`, serves canned responses by method + path
//! and records every request so tests can assert what was (not) sent.
//! Several responses for one route are served in order; the last repeats.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use reqwest::Url;
use serde_json::Value;

use crate::error::ClientError;
use crate::interaction::{Confirm, UrlOpener};

#[derive(Debug, Clone)]
pub struct StubResponse {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
}

impl StubResponse {
    pub fn ok(method: &'static str, path: &str, body: Value) -> Self {
        Self::json(method, path, 200, body)
    }

    pub fn json(method: &'static str, path: &str, status: u16, body: Value) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }

    pub fn text(method: &'static str, path: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        let url = Url::parse(&format!("http://stub{}?{}", self.path, self.query.as_deref()?)).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

struct StubState {
    responses: Mutex<Vec<StubResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let state = Arc::new(StubState {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(String::from),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let matched = {
        let mut responses = state.responses.lock().unwrap();
        let route: Vec<usize> = responses
            .iter()
            .enumerate()
            .filter(|(_, r)| r.method == method.as_str() && r.path == path)
            .map(|(i, _)| i)
            .collect();
        match route.as_slice() {
            [] => None,
            [only] => Some(responses[*only].clone()),
            [first, ..] => Some(responses.remove(*first)),
        }
    };

    match matched {
        Some(r) => (
            StatusCode::from_u16(r.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            r.body,
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            format!("{{\"message\":\"no stub for {method} {path}\"}}"),
        ),
    }
}

/// Opener that records URLs instead of launching a browser.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &Url) -> Result<(), ClientError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Confirmation dialog with a fixed answer that counts prompts.
pub struct ScriptedConfirm {
    answer: bool,
    asked: AtomicUsize,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

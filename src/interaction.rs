//! Seams between client logic and whatever renders it.
//!
//! - `Notifier`: typed success/error/info messages (the toasts)
//! - `Confirm`: yes/no prompt before destructive actions
//! - `UrlOpener`: "open in a new tab" for meeting and checkout links

use reqwest::Url;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Sending half of the notification channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half, owned by the view layer.
pub struct NotificationReceiver {
    rx: mpsc::UnboundedReceiver<Notification>,
}

/// Create a connected notifier/receiver pair.
pub fn notifier() -> (Notifier, NotificationReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NotificationReceiver { rx })
}

impl Notifier {
    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification {
            level,
            message: message.into(),
        };
        // A closed receiver means nobody is displaying toasts any more.
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped, receiver closed");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Report a failure: full error to the log, one line to the user.
    pub fn failure(&self, context: &str, err: &ClientError) {
        tracing::warn!(context, error = %err, "Action failed");
        self.error(err.user_message());
    }
}

impl NotificationReceiver {
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Everything queued so far, without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            out.push(n);
        }
        out
    }
}

/// Confirmation dialog.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Opens a URL outside the app (new browser tab or system browser).
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &Url) -> Result<(), ClientError>;
}

/// Confirms every prompt. For headless callers that have already asked.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Logs the URL instead of opening it. Headless default.
pub struct LogOpener;

impl UrlOpener for LogOpener {
    fn open(&self, url: &Url) -> Result<(), ClientError> {
        tracing::info!(%url, "Open external link");
        Ok(())
    }
}

/// Parse a URL returned by the backend; only http(s) links are opened.
pub fn parse_external_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!("unsupported scheme `{other}`"))),
    }
}

use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "CarePoint";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `CAREPOINT_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Prefix for meeting links built from a bare meeting id.
pub const DEFAULT_MEETING_JOIN_BASE: &str = "https://zoom.us/j";

/// Page size every table starts with.
pub const DEFAULT_PAGE_SIZE: usize = 10;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "carepoint_lib=info,warn"
}

/// Connection settings for the REST backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub api_base_url: String,
    /// Base URL for meeting join links, without trailing slash.
    pub meeting_join_base: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` leaves it to the network stack.
    pub request_timeout: Option<Duration>,
    pub default_page_size: usize,
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            meeting_join_base: DEFAULT_MEETING_JOIN_BASE.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Read `CAREPOINT_API_BASE_URL`, `CAREPOINT_MEETING_JOIN_BASE` and
    /// `CAREPOINT_REQUEST_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let base = std::env::var("CAREPOINT_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let mut config = Self::new(&base);

        if let Ok(join) = std::env::var("CAREPOINT_MEETING_JOIN_BASE") {
            config = config.with_meeting_join_base(&join);
        }

        if let Ok(raw) = std::env::var("CAREPOINT_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.request_timeout = Some(Duration::from_secs(secs));
                }
                _ => tracing::warn!(value = %raw, "Ignoring invalid CAREPOINT_REQUEST_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn with_meeting_join_base(mut self, base: &str) -> Self {
        self.meeting_join_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Absolute URL for a backend path such as `/appointments/42`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = ClientConfig::new("https://api.example.org/v1/");
        assert_eq!(config.api_base_url, "https://api.example.org/v1");
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let config = ClientConfig::new("https://api.example.org/v1/");
        assert_eq!(
            config.endpoint("/appointments/7"),
            "https://api.example.org/v1/appointments/7"
        );
        assert_eq!(
            config.endpoint("payments/initialize"),
            "https://api.example.org/v1/payments/initialize"
        );
    }

    #[test]
    fn defaults_have_no_request_timeout() {
        let config = ClientConfig::default();
        assert!(config.request_timeout.is_none());
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.meeting_join_base, DEFAULT_MEETING_JOIN_BASE);
    }

    #[test]
    fn meeting_base_is_normalized() {
        let config = ClientConfig::default().with_meeting_join_base("https://meet.example/j/");
        assert_eq!(config.meeting_join_base, "https://meet.example/j");
    }

    #[test]
    fn app_name_is_carepoint() {
        assert_eq!(APP_NAME, "CarePoint");
    }
}

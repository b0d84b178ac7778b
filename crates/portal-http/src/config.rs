//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`HttpConfig::base_url`].
pub const BASE_URL_ENV: &str = "PORTAL_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Deadline applied to every request unless the call overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Deadline for [`HttpClient::check_tunnel`](crate::HttpClient::check_tunnel).
pub const TUNNEL_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_AUTH_SCHEME: &str = "Token";

/// What to do when the server answers with a bare 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedPolicy {
    /// Log a warning and return the envelope.
    #[default]
    Warn,
    /// Also invalidate the stored session.
    ClearSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub auth_scheme: String,
    pub unauthorized: UnauthorizedPolicy,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            unauthorized: UnauthorizedPolicy::Warn,
        }
    }
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Applies the base URL from [`BASE_URL_ENV`] when it is set and non-empty.
    #[must_use]
    pub fn with_env_override(self) -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) => self.with_base_url_override(Some(url)),
            Err(_) => self,
        }
    }

    #[must_use]
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            tracing::debug!(base_url = %url, "base URL overridden");
            self.base_url = url;
        }
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn unauthorized_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.unauthorized = policy;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.auth_scheme, "Token");
        assert_eq!(config.unauthorized, UnauthorizedPolicy::Warn);
    }

    #[test]
    fn partial_config_deserializes() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"base_url":"http://api","unauthorized":"clear_session"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://api");
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.unauthorized, UnauthorizedPolicy::ClearSession);
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = HttpConfig::new("http://a").with_base_url_override(Some("  ".into()));
        assert_eq!(config.base_url, "http://a");
        let config = config.with_base_url_override(Some("http://b".into()));
        assert_eq!(config.base_url, "http://b");
    }
}

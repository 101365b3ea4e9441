use std::time::Duration;

use crate::errors::SploxError;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://app.splox.io/api/v1";
/// Default per-request timeout for REST calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`crate::Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API key used for bearer auth. Empty means no `Authorization` header.
    pub api_key: String,
    /// Base URL of the API, including the version prefix.
    pub base_url: String,
    /// Timeout applied to REST requests. Event streams are not bound by it.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a config from `SPLOX_API_KEY` and the optional `SPLOX_BASE_URL`.
    ///
    /// A missing key is allowed; webhook events can be sent without one.
    pub fn from_env() -> Self {
        let api_key = std::env::var("SPLOX_API_KEY").unwrap_or_default();
        let mut config = Self::new(api_key.trim());
        if let Ok(base_url) = std::env::var("SPLOX_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config = config.base_url(normalize_base_url(&base_url));
        }
        config
    }

    /// Overrides the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Overrides the API base URL (for proxies or test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the REST request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SploxError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(SploxError::Config("base_url must not be empty".into()));
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(SploxError::Config(format!(
                "base_url must start with http:// or https://, got {base}"
            )));
        }
        if self.timeout.is_zero() {
            return Err(SploxError::Config("timeout must be greater than 0".into()));
        }
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }

    pub(crate) fn bearer(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

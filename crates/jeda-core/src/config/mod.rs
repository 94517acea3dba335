//! Client configuration shared by every Jeda front end.
//!
//! Provides `ClientConfig`, the validated description of where the Jeda API
//! lives and how long requests may take.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

/// Default timeout for API requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Validated API client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    /// Build a config for the API at `api_base_url` (e.g. `https://jeda.example.com`).
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            api_base_url: normalize_required_http_url(api_base_url.into(), "api_base_url")?,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        })
    }

    /// Resolve an optional base URL; `Ok(None)` means the client runs offline.
    pub fn from_optional_url(api_base_url: Option<String>) -> Result<Option<Self>, String> {
        normalize_text_option(api_base_url).map(Self::new).transpose()
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub const fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    /// Absolute URL for an API path such as `/api/settings`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn normalize_required_http_url(raw: String, field: &str) -> Result<String, String> {
    let value =
        normalize_text_option(Some(raw)).ok_or_else(|| format!("config field '{field}' is required"))?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!(
            "config field '{field}' must include http:// or https://"
        ))
    }
}

//! HTTP client for the Jeda settings and statistics endpoints.

use std::fmt;

use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{ActivitySummary, RankingsPage, Settings};
use crate::util::parse_api_error;

/// Cookie carrying the auth session token.
pub const SESSION_COOKIE_NAME: &str = "ba_.session_token";

const SETTINGS_PATH: &str = "/api/settings";
const STATS_SUMMARY_PATH: &str = "/api/stats/summary";
const STATS_RANKINGS_PATH: &str = "/api/stats/rankings";

#[derive(Debug, Error)]
pub enum RemoteSyncError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("API HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid API payload: {0}")]
    InvalidPayload(String),
}

impl RemoteSyncError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteSyncError>;

/// Client for the settings and statistics API.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: reqwest::Client,
    session_token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("api_base_url", &self.config.api_base_url())
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            config,
            client,
            session_token: None,
        })
    }

    /// Attach the session token sent with every request.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        self.session_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn has_session(&self) -> bool {
        self.session_token.is_some()
    }

    /// `POST /api/settings` with the full settings object.
    pub async fn post_settings(&self, settings: &Settings) -> RemoteResult<()> {
        if !settings.is_normalized() {
            return Err(RemoteSyncError::InvalidPayload(
                "settings must be normalized before submission".to_string(),
            ));
        }

        let request = self
            .authorized(self.client.post(self.config.endpoint(SETTINGS_PATH)))
            .json(settings);
        let response = request.send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// `GET /api/settings`; `None` when the account has nothing stored yet.
    pub async fn get_settings(&self) -> RemoteResult<Option<Settings>> {
        let request = self.authorized(self.client.get(self.config.endpoint(SETTINGS_PATH)));
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        decode_body(response).await
    }

    /// `GET /api/stats/summary`
    pub async fn fetch_summary(&self) -> RemoteResult<ActivitySummary> {
        self.get_json(self.client.get(self.config.endpoint(STATS_SUMMARY_PATH)))
            .await
    }

    /// `GET /api/stats/rankings?page&limit`
    pub async fn fetch_rankings(&self, page: u32, limit: u32) -> RemoteResult<RankingsPage> {
        if page == 0 || limit == 0 {
            return Err(RemoteSyncError::InvalidConfiguration(
                "page and limit must be at least 1".to_string(),
            ));
        }

        let request = self
            .client
            .get(self.config.endpoint(STATS_RANKINGS_PATH))
            .query(&[("page", page), ("limit", limit)]);
        self.get_json(request).await
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = self.authorized(request).send().await?;
        let response = ensure_success(response).await?;
        decode_body(response).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match &self.session_token {
            Some(token) => request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}")),
            None => request,
        }
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|error| RemoteSyncError::InvalidPayload(error.to_string()))
}

async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteSyncError::Api {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

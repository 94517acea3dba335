//! Shared auth session client logic.
//!
//! The auth server owns the OAuth dance; this module only asks it for the
//! current session, starts social sign-in, signs out and deletes accounts.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::SESSION_COOKIE_NAME;
use crate::config::ClientConfig;
use crate::util::{parse_api_error, to_slug};

/// Text a user must type to confirm account deletion.
pub const DELETE_CONFIRMATION_TEXT: &str = "DELETE";

const GET_SESSION_PATH: &str = "/api/auth/get-session";
const SIGN_IN_SOCIAL_PATH: &str = "/api/auth/sign-in/social";
const SIGN_OUT_PATH: &str = "/api/auth/sign-out";
const DELETE_USER_PATH: &str = "/api/auth/delete-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    GitHub,
    Google,
    Discord,
}

impl SocialProvider {
    pub const ALL: [Self; 3] = [Self::GitHub, Self::Google, Self::Discord];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Google => "google",
            Self::Discord => "discord",
        }
    }
}

impl FromStr for SocialProvider {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let slug = to_slug(value).replace('-', "");
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == slug)
            .ok_or(SessionError::InvalidConfiguration(
                "provider must be one of github, google, discord",
            ))
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now())
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Where the user has to go to finish a social sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialSignIn {
    pub provider: SocialProvider,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Auth is not configured: no API base URL is set.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Please type the confirmation text exactly as shown ({DELETE_CONFIRMATION_TEXT})")]
    ConfirmationMismatch,
}

pub type SessionResult<T> = Result<T, SessionError>;

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> SessionResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> SessionResult<()>;
    fn clear_session(&self) -> SessionResult<()>;
}

/// Session store kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<AuthSession>>>,
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> SessionResult<Option<AuthSession>> {
        let guard = self
            .inner
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &AuthSession) -> SessionResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> SessionResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|error| SessionError::SecureStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// The authentication collaborator as seen by the rest of the client.
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    /// Current session, `None` when signed out.
    async fn get_session(&self) -> SessionResult<Option<AuthSession>>;

    /// Start a social sign-in and return the URL the user must open.
    async fn sign_in_social(&self, provider: SocialProvider) -> SessionResult<SocialSignIn>;

    async fn sign_out(&self) -> SessionResult<()>;

    /// Delete the signed-in account.
    async fn delete_user(&self) -> SessionResult<()>;

    /// Session lookup for sync decisions; a failed lookup counts as signed out.
    async fn session_or_signed_out(&self) -> Option<AuthSession> {
        match self.get_session().await {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!("Session lookup failed, continuing signed out: {}", error);
                None
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        self.session_or_signed_out().await.is_some()
    }
}

/// HTTP session client for the Jeda auth server.
#[derive(Clone)]
pub struct AuthClient<S: SessionPersistence> {
    config: ClientConfig,
    client: Client,
    store: S,
    callback_url: String,
}

impl<S: SessionPersistence> AuthClient<S> {
    pub fn new(config: ClientConfig, store: S) -> SessionResult<Self> {
        let callback_url = format!("{}/", config.api_base_url());
        Ok(Self {
            client: Client::builder().timeout(config.request_timeout()).build()?,
            config,
            store,
            callback_url,
        })
    }

    /// Override the page the auth server redirects to after sign-in.
    #[must_use]
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = callback_url.into();
        self
    }

    /// Session token stored locally, without asking the server.
    pub fn stored_session(&self) -> SessionResult<Option<AuthSession>> {
        self.store.load_session()
    }

    /// Adopt a session token obtained in the browser and validate it.
    pub async fn complete_sign_in(&self, token: &str) -> SessionResult<AuthSession> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "Session token must not be empty",
            ));
        }

        match self.fetch_session(token).await? {
            Some(session) => {
                self.store.save_session(&session)?;
                tracing::debug!(user = %session.user.id, "Stored new auth session");
                Ok(session)
            }
            None => Err(SessionError::Api(
                "Session token was rejected by the server".to_string(),
            )),
        }
    }

    async fn fetch_session(&self, token: &str) -> SessionResult<Option<AuthSession>> {
        let request = with_session_cookie(
            self.client
                .get(self.config.endpoint(GET_SESSION_PATH))
                .header(ACCEPT, "application/json"),
            token,
        );
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Api(parse_api_error(status, &body)));
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<Option<GetSessionResponse>>(&body)?;
        Ok(payload.map(|payload| payload.into_session(token)))
    }

    async fn post_with_session(&self, path: &str) -> SessionResult<()> {
        let session = self.store.load_session()?.ok_or(SessionError::NotSignedIn)?;
        let request = with_session_cookie(
            self.client
                .post(self.config.endpoint(path))
                .json(&serde_json::json!({})),
            &session.token,
        );
        let response = request.send().await?;
        if !(response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Api(parse_api_error(status, &body)));
        }
        Ok(())
    }
}

fn with_session_cookie(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"))
}

impl<S: SessionPersistence> SessionProvider for AuthClient<S> {
    async fn get_session(&self) -> SessionResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if stored_session.is_expired() {
            tracing::debug!("Stored auth session expired");
            self.store.clear_session()?;
            return Ok(None);
        }

        match self.fetch_session(&stored_session.token).await? {
            Some(session) => {
                if session != stored_session {
                    self.store.save_session(&session)?;
                }
                Ok(Some(session))
            }
            None => {
                tracing::debug!("Auth server no longer recognises the stored session");
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    async fn sign_in_social(&self, provider: SocialProvider) -> SessionResult<SocialSignIn> {
        let payload = serde_json::json!({
            "provider": provider.as_str(),
            "callbackURL": self.callback_url,
            "disableRedirect": true,
        });
        let response = self
            .client
            .post(self.config.endpoint(SIGN_IN_SOCIAL_PATH))
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<SocialSignInResponse>().await?;
        let url = payload
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SessionError::Api("Sign-in response did not include a redirect URL".to_string())
            })?;
        Ok(SocialSignIn { provider, url })
    }

    async fn sign_out(&self) -> SessionResult<()> {
        let remote = if self.store.load_session()?.is_some() {
            self.post_with_session(SIGN_OUT_PATH).await
        } else {
            Ok(())
        };
        self.store.clear_session()?;
        if let Err(error) = &remote {
            tracing::warn!("Remote sign-out failed, local session cleared: {}", error);
        }
        remote
    }

    async fn delete_user(&self) -> SessionResult<()> {
        self.post_with_session(DELETE_USER_PATH).await?;
        self.store.clear_session()
    }
}

/// Check the text typed to confirm account deletion.
pub fn confirm_account_deletion(input: &str) -> SessionResult<()> {
    if input == DELETE_CONFIRMATION_TEXT {
        Ok(())
    } else {
        Err(SessionError::ConfirmationMismatch)
    }
}

#[derive(Debug, Deserialize)]
struct GetSessionResponse {
    session: SessionPayload,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl GetSessionResponse {
    fn into_session(self, request_token: &str) -> AuthSession {
        let token = self
            .session
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .unwrap_or_else(|| request_token.to_string());
        let name = self
            .user
            .name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.user.email.clone())
            .unwrap_or_else(|| self.user.id.clone());

        AuthSession {
            token,
            expires_at: self.session.expires_at,
            user: AuthUser {
                id: self.user.id,
                name,
                email: self.user.email,
                image: self.user.image,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SocialSignInResponse {
    url: Option<String>,
}

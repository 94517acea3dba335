use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jeda_core::api::ApiClient;
use jeda_core::auth::{AuthSession, SessionProvider};
use jeda_core::config::ClientConfig;
use jeda_core::models::{
    first_rank_on_page, format_focus_time, ActivitySummary, AlarmSound, Backsound, RankingsPage,
    Settings, SettingsField, Swatch,
};
use jeda_core::settings::{CommitResult, SettingsStore, SettingsSync, SyncNotification};
use jeda_core::storage::JsonFileSettingsRepository;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::auth::{auth_client_for_profile, ProfileAuthClient};
use crate::config_profiles::{
    default_settings_path, normalize_text_option, CliProfile, CliProfilesConfig, API_BASE_URL_ENV,
};
use crate::error::CliError;

/// Extra time allowed for a background settings save before the CLI exits.
const REMOTE_SAVE_GRACE: Duration = Duration::from_secs(2);

/// Resolved profile plus the paths and endpoints derived from it.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub profile_name: String,
    pub profile: CliProfile,
    pub settings_path: PathBuf,
}

impl CliContext {
    pub fn resolve(
        explicit_profile: Option<&str>,
        cli_settings_path: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(explicit_profile);
        let profile = config.profile(&profile_name).cloned().unwrap_or_default();
        let settings_path = resolve_settings_path(cli_settings_path, &profile)?;
        Ok(Self {
            profile_name,
            profile,
            settings_path,
        })
    }

    /// API configuration; `JEDA_API_BASE_URL` overrides the profile.
    pub fn client_config(&self) -> Result<Option<ClientConfig>, CliError> {
        let url = normalize_text_option(std::env::var(API_BASE_URL_ENV).ok())
            .or_else(|| self.profile.api_base_url());
        ClientConfig::from_optional_url(url).map_err(CliError::Config)
    }

    pub fn require_client_config(&self) -> Result<ClientConfig, CliError> {
        self.client_config()?.ok_or(CliError::ApiNotConfigured)
    }

    pub fn auth_client(&self) -> Result<Option<ProfileAuthClient>, CliError> {
        let Some(config) = self.client_config()? else {
            return Ok(None);
        };
        auth_client_for_profile(&self.profile_name, config)
            .map(Some)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    /// Validated session for this profile; lookup failures count as signed out.
    pub async fn current_session(&self) -> Result<Option<AuthSession>, CliError> {
        let Some(auth) = self.auth_client()? else {
            return Ok(None);
        };
        Ok(auth.session_or_signed_out().await)
    }

    /// API client carrying the profile's session, or an error when signed out.
    pub async fn signed_in_api_client(&self) -> Result<ApiClient, CliError> {
        let config = self.require_client_config()?;
        let session = self.current_session().await?.ok_or(CliError::NotSignedIn)?;
        Ok(ApiClient::new(config)?.with_session_token(session.token))
    }

    pub fn open_store(&self) -> SettingsStore {
        SettingsStore::open(Arc::new(JsonFileSettingsRepository::new(
            self.settings_path.clone(),
        )))
    }
}

pub fn resolve_settings_path(
    cli_settings_path: Option<PathBuf>,
    profile: &CliProfile,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_settings_path.or_else(|| profile.settings_path.clone()) {
        return Ok(path);
    }
    default_settings_path().map_err(CliError::Config)
}

/// Settings sync wired to the profile's API session when one exists.
pub struct OpenedSync {
    pub sync: SettingsSync<ApiClient>,
    pub notifications: UnboundedReceiver<SyncNotification>,
    pub authenticated: bool,
    /// Request timeout of the remote, `Duration::ZERO` when saving locally only.
    pub request_timeout: Duration,
}

pub async fn open_settings_sync(
    context: &CliContext,
    local_only: bool,
) -> Result<OpenedSync, CliError> {
    let store = context.open_store();
    let mut remote = None;
    let mut request_timeout = Duration::ZERO;
    if !local_only {
        if let Some(config) = context.client_config()? {
            if let Some(session) = context.current_session().await? {
                request_timeout = config.request_timeout();
                remote = Some(ApiClient::new(config)?.with_session_token(session.token));
            }
        }
    }

    let authenticated = remote.is_some();
    let (sync, notifications) = SettingsSync::new(store, remote, Handle::current());
    Ok(OpenedSync {
        sync,
        notifications,
        authenticated,
        request_timeout,
    })
}

/// Wait for the background save started by a commit, if any, and report it.
pub async fn report_commit(
    result: CommitResult,
    notifications: &mut UnboundedReceiver<SyncNotification>,
    request_timeout: Duration,
) {
    match result {
        CommitResult::Unchanged => println!("Settings unchanged"),
        CommitResult::Committed { submission: None } => println!("Settings saved locally"),
        CommitResult::Committed {
            submission: Some(submission),
        } => {
            println!("Settings saved locally");
            let wait = request_timeout + REMOTE_SAVE_GRACE;
            loop {
                match tokio::time::timeout(wait, notifications.recv()).await {
                    Ok(Some(SyncNotification::RemoteSaved { submission: done }))
                        if done == submission =>
                    {
                        println!("Settings saved to your account");
                        break;
                    }
                    Ok(Some(SyncNotification::RemoteFailed {
                        submission: done,
                        error,
                    })) if done == submission => {
                        eprintln!("Warning: failed to save settings to your account: {error}");
                        break;
                    }
                    Ok(Some(SyncNotification::LocalSaveFailed { error })) => {
                        eprintln!("Warning: failed to write the settings file: {error}");
                    }
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(_) => {
                        eprintln!("Warning: account save still pending; it may not complete");
                        break;
                    }
                }
            }
        }
    }
}

pub fn parse_assignment(assignment: &str) -> Result<(SettingsField, &str), CliError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| CliError::InvalidAssignment(assignment.to_string()))?;
    if key.trim().is_empty() {
        return Err(CliError::InvalidAssignment(assignment.to_string()));
    }
    Ok((key.parse::<SettingsField>()?, value))
}

pub fn format_settings_lines(settings: &Settings) -> Vec<String> {
    let width = SettingsField::ALL
        .iter()
        .map(|field| field.key().len())
        .max()
        .unwrap_or_default();
    SettingsField::ALL
        .iter()
        .map(|field| {
            format!(
                "{:<width$}  {}",
                field.key(),
                settings.display_value(*field)
            )
        })
        .collect()
}

pub fn format_field_help_lines() -> Vec<String> {
    let swatches = Swatch::ALL
        .iter()
        .map(|swatch| swatch.name())
        .collect::<Vec<_>>()
        .join(", ");
    let alarms = AlarmSound::ALL
        .iter()
        .map(|sound| sound.file_name())
        .collect::<Vec<_>>()
        .join(", ");
    let backsounds = Backsound::ALL
        .iter()
        .map(|sound| {
            if sound.file_name().is_empty() {
                "none"
            } else {
                sound.file_name()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    SettingsField::ALL
        .iter()
        .map(|field| {
            let accepted = match field {
                SettingsField::Numeric(numeric) => format!("whole number 1-{}", numeric.max()),
                SettingsField::AutoStartBreaks | SettingsField::AutoStartPomodoros => {
                    "true or false".to_string()
                }
                SettingsField::Color(_) => swatches.clone(),
                SettingsField::Volume => "0-1 or 0%-100%".to_string(),
                SettingsField::AlarmSound => alarms.clone(),
                SettingsField::Backsound => backsounds.clone(),
            };
            format!("{:<20}  {accepted}", field.key())
        })
        .collect()
}

pub fn format_summary_lines(summary: &ActivitySummary) -> Vec<String> {
    vec![
        format!("User            {}", summary.username),
        format!("Hours focused   {:.1}", summary.hours_spent),
        format!("Days accessed   {}", summary.days_accessed),
        format!("Current streak  {} days", summary.current_streak),
        format!("Last active     {}", summary.last_active_label()),
    ]
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingItem {
    pub rank: u64,
    pub id: String,
    pub username: String,
    pub total_focus_time: u64,
    pub focus_time: String,
    pub streak: u32,
}

pub fn ranking_items(page: &RankingsPage, page_number: u32, limit: u32) -> Vec<RankingItem> {
    let first_rank = first_rank_on_page(page_number, limit);
    page.users
        .iter()
        .zip(first_rank..)
        .map(|(user, rank)| RankingItem {
            rank,
            id: user.id.clone(),
            username: user.username.clone(),
            total_focus_time: user.total_focus_time,
            focus_time: format_focus_time(user.total_focus_time),
            streak: user.streak,
        })
        .collect()
}

pub fn format_ranking_lines(items: &[RankingItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            format!(
                "#{:<4}  {:<24}  {:>9}  {}d streak",
                item.rank, item.username, item.focus_time, item.streak
            )
        })
        .collect()
}

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jeda_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] jeda_core::models::ValidationError),
    #[error(transparent)]
    Remote(#[from] jeda_core::api::RemoteSyncError),
    #[error("Expected FIELD=VALUE, got '{0}'")]
    InvalidAssignment(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "API is not configured. Run `jeda config init --api-base-url <URL>` or set JEDA_API_BASE_URL."
    )]
    ApiNotConfigured,
    #[error("Not signed in. Run `jeda auth login` first.")]
    NotSignedIn,
}

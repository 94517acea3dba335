//! Error types for jeda-core

use thiserror::Error;

use crate::api::RemoteSyncError;
use crate::auth::SessionError;
use crate::models::ValidationError;

/// Result type alias using jeda-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jeda-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local settings storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Field text could not be interpreted
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote API call failed
    #[error(transparent)]
    Remote(#[from] RemoteSyncError),

    /// Session provider call failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

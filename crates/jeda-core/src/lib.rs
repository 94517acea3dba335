//! jeda-core - Core library for Jeda
//!
//! This crate contains the settings model, local persistence, remote API
//! client, and the settings synchronization used by Jeda interfaces.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod settings;
pub mod state;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use models::{Settings, SettingsEdit, SettingsField};
pub use settings::{Draft, SettingsStore, SettingsSync};
pub use state::SyncState;

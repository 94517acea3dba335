//! Settings repository implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::models::Settings;

/// Trait for settings storage operations
///
/// Calls are synchronous: the committed value is written before a settings
/// session close returns.
pub trait SettingsRepository: Send + Sync {
    /// Load stored settings, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<Settings>>;

    /// Save settings, replacing any previous value
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// JSON file implementation of `SettingsRepository`
#[derive(Debug, Clone)]
pub struct JsonFileSettingsRepository {
    path: PathBuf,
}

impl JsonFileSettingsRepository {
    /// Create a repository backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsRepository for JsonFileSettingsRepository {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash never leaves a half-written file.
        let serialized = serde_json::to_string_pretty(settings)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory implementation of `SettingsRepository`
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsRepository {
    inner: Arc<Mutex<Option<Settings>>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(settings))),
        }
    }
}

impl SettingsRepository for MemorySettingsRepository {
    fn load(&self) -> Result<Option<Settings>> {
        let guard = self
            .inner
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

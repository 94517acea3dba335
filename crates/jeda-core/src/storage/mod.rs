//! Local persistence for committed settings.

mod settings_file;

pub use settings_file::{JsonFileSettingsRepository, MemorySettingsRepository, SettingsRepository};

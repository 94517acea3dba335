//! Owned single-writer cell holding the committed settings.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::models::Settings;
use crate::storage::SettingsRepository;

/// The authoritative local settings value.
///
/// Readers take a [`snapshot`](Self::snapshot) or [`subscribe`](Self::subscribe)
/// to changes. Only [`SettingsSync`](super::SettingsSync) commits new values,
/// and every commit is written through to the repository.
#[derive(Clone)]
pub struct SettingsStore {
    sender: Arc<watch::Sender<Settings>>,
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsStore {
    /// Open the store, starting from the repository's saved value.
    ///
    /// A missing value yields defaults; an unreadable one is logged and also
    /// yields defaults, leaving the file untouched until the next commit.
    pub fn open(repository: Arc<dyn SettingsRepository>) -> Self {
        let initial = match repository.load() {
            Ok(Some(settings)) => settings.normalized(),
            Ok(None) => Settings::default(),
            Err(error) => {
                tracing::warn!("Failed to load local settings, using defaults: {}", error);
                Settings::default()
            }
        };
        Self::with_initial(initial, repository)
    }

    pub fn with_initial(initial: Settings, repository: Arc<dyn SettingsRepository>) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            repository,
        }
    }

    /// Current committed settings.
    pub fn snapshot(&self) -> Settings {
        self.sender.borrow().clone()
    }

    /// Receiver that observes every commit.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.sender.subscribe()
    }

    /// Replace the committed value, then persist it.
    ///
    /// The in-memory value is updated even when persisting fails.
    pub(crate) fn commit(&self, settings: Settings) -> Result<()> {
        self.sender.send_replace(settings.clone());
        self.repository.save(&settings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;
    use crate::storage::MemorySettingsRepository;

    struct FailingRepository;

    impl SettingsRepository for FailingRepository {
        fn load(&self) -> Result<Option<Settings>> {
            Err(Error::Storage("disk unavailable".to_string()))
        }

        fn save(&self, _settings: &Settings) -> Result<()> {
            Err(Error::Storage("disk unavailable".to_string()))
        }
    }

    #[test]
    fn open_uses_saved_settings() {
        let saved = Settings {
            pomodoro_time: 45,
            ..Settings::default()
        };
        let store = SettingsStore::open(Arc::new(MemorySettingsRepository::with_settings(
            saved.clone(),
        )));
        assert_eq!(store.snapshot(), saved);
    }

    #[test]
    fn open_falls_back_to_defaults_when_load_fails() {
        let store = SettingsStore::open(Arc::new(FailingRepository));
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[test]
    fn commit_notifies_subscribers_and_persists() {
        let repository = MemorySettingsRepository::new();
        let store = SettingsStore::open(Arc::new(repository.clone()));
        let mut receiver = store.subscribe();

        let updated = Settings {
            long_break_interval: 6,
            ..Settings::default()
        };
        store.commit(updated.clone()).unwrap();

        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), updated);
        assert_eq!(repository.load().unwrap(), Some(updated));
    }

    #[test]
    fn commit_keeps_memory_value_when_persist_fails() {
        let store = SettingsStore::with_initial(Settings::default(), Arc::new(FailingRepository));
        let updated = Settings {
            volume: 0.3,
            ..Settings::default()
        };

        assert!(store.commit(updated.clone()).is_err());
        assert_eq!(store.snapshot(), updated);
    }
}

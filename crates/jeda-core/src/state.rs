//! Shared cross-platform state types.

/// Outcome of the most recently finished remote settings operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No remote operation has run (signed out or no API configured)
    #[default]
    Offline,
    Syncing,
    Synced,
    Error,
}

impl SyncState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

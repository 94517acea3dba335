//! Settings editing sessions and synchronization.

mod draft;
mod store;
mod sync;

pub use draft::{Draft, NumericInput};
pub use store::SettingsStore;
pub use sync::{CommitResult, ReconcileOutcome, SettingsRemote, SettingsSync, SyncNotification};

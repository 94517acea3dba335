//! Local-first settings commit with a best-effort remote mirror.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::api::{ApiClient, RemoteResult, RemoteSyncError};
use crate::models::Settings;
use crate::settings::{Draft, SettingsStore};
use crate::state::SyncState;

/// Remote persistence for settings of a signed-in user.
pub trait SettingsRemote: Send + Sync + 'static {
    /// Store the full, normalized settings object.
    fn push_settings(&self, settings: &Settings) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Fetch stored settings; `None` when the account has none yet.
    fn fetch_settings(&self) -> impl Future<Output = RemoteResult<Option<Settings>>> + Send;
}

impl SettingsRemote for ApiClient {
    fn push_settings(&self, settings: &Settings) -> impl Future<Output = RemoteResult<()>> + Send {
        self.post_settings(settings)
    }

    fn fetch_settings(&self) -> impl Future<Output = RemoteResult<Option<Settings>>> + Send {
        self.get_settings()
    }
}

/// Result of closing an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// The draft was never edited and was dropped
    Unchanged,
    /// The draft is now the committed value; `submission` identifies the
    /// remote mirror started for it, if any
    Committed { submission: Option<u64> },
}

/// Side-channel reports from background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotification {
    RemoteSaved { submission: u64 },
    RemoteFailed { submission: u64, error: String },
    LocalSaveFailed { error: String },
}

/// What sign-in reconciliation did with local and remote settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No remote is configured
    Offline,
    /// The account's stored settings replaced the local value
    AdoptedRemote,
    /// The account had no settings; the local value was uploaded
    PushedLocal,
}

/// Owner of the committed settings and of the editing session lifecycle.
pub struct SettingsSync<R: SettingsRemote> {
    store: SettingsStore,
    remote: Option<Arc<R>>,
    runtime: Handle,
    notifications: mpsc::UnboundedSender<SyncNotification>,
    sync_state: Arc<watch::Sender<SyncState>>,
    next_submission: AtomicU64,
}

impl<R: SettingsRemote> SettingsSync<R> {
    /// Build the sync owner; background submissions run on `runtime`.
    ///
    /// The returned receiver carries [`SyncNotification`]s for display or
    /// logging. Dropping it is allowed.
    pub fn new(
        store: SettingsStore,
        remote: Option<R>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SyncNotification>) {
        let (notifications, receiver) = mpsc::unbounded_channel();
        let (sync_state, _) = watch::channel(SyncState::Offline);
        let sync = Self {
            store,
            remote: remote.map(Arc::new),
            runtime,
            notifications,
            sync_state: Arc::new(sync_state),
            next_submission: AtomicU64::new(0),
        };
        (sync, receiver)
    }

    pub const fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn snapshot(&self) -> Settings {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.store.subscribe()
    }

    pub fn sync_state(&self) -> watch::Receiver<SyncState> {
        self.sync_state.subscribe()
    }

    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Start an editing session from the committed value.
    pub fn open_session(&self) -> Draft {
        tracing::debug!("Opened settings session");
        Draft::from_committed(self.store.snapshot())
    }

    /// End an editing session.
    ///
    /// A dirty draft is committed locally before this returns; the remote
    /// mirror, when `is_authenticated`, runs detached and reports through the
    /// notification channel. Remote failure never rolls the commit back.
    pub fn close_session(&self, draft: Draft, is_authenticated: bool) -> CommitResult {
        if !draft.is_dirty() {
            tracing::debug!("Closed settings session without changes");
            return CommitResult::Unchanged;
        }

        let settings = draft.normalized();
        self.commit_locally(settings.clone());
        tracing::info!("Committed settings");

        let submission = if is_authenticated {
            self.spawn_submission(settings)
        } else {
            None
        };
        CommitResult::Committed { submission }
    }

    /// Align local and remote settings after sign-in.
    ///
    /// Stored account settings win; an account without settings receives the
    /// local value.
    pub async fn reconcile_on_sign_in(&self) -> RemoteResult<ReconcileOutcome> {
        let Some(remote) = self.remote.as_ref() else {
            return Ok(ReconcileOutcome::Offline);
        };

        self.sync_state.send_replace(SyncState::Syncing);
        let outcome = match remote.fetch_settings().await {
            Ok(Some(remote_settings)) => {
                let remote_settings = remote_settings.normalized();
                if remote_settings != self.store.snapshot() {
                    self.commit_locally(remote_settings);
                    tracing::info!("Adopted account settings from remote");
                }
                Ok(ReconcileOutcome::AdoptedRemote)
            }
            Ok(None) => remote
                .push_settings(&self.store.snapshot())
                .await
                .map(|()| ReconcileOutcome::PushedLocal),
            Err(error) => Err(error),
        };

        match &outcome {
            Ok(_) => {
                self.sync_state.send_replace(SyncState::Synced);
            }
            Err(error) => {
                tracing::warn!("Settings reconciliation failed: {}", error);
                self.sync_state.send_replace(SyncState::Error);
            }
        }
        outcome
    }

    /// Sign-out keeps the committed value; only the sync state changes.
    pub fn on_sign_out(&self) {
        self.sync_state.send_replace(SyncState::Offline);
    }

    fn commit_locally(&self, settings: Settings) {
        if let Err(error) = self.store.commit(settings) {
            tracing::warn!("Failed to persist settings locally: {}", error);
            self.notify(SyncNotification::LocalSaveFailed {
                error: error.to_string(),
            });
        }
    }

    fn spawn_submission(&self, settings: Settings) -> Option<u64> {
        let Some(remote) = self.remote.as_ref().map(Arc::clone) else {
            tracing::debug!("No remote configured; settings kept locally");
            return None;
        };

        let submission = self.next_submission.fetch_add(1, Ordering::Relaxed) + 1;
        let notifications = self.notifications.clone();
        let sync_state = Arc::clone(&self.sync_state);
        sync_state.send_replace(SyncState::Syncing);

        self.runtime.spawn(async move {
            let notification = match remote.push_settings(&settings).await {
                Ok(()) => {
                    tracing::info!(submission, "Saved settings remotely");
                    sync_state.send_replace(SyncState::Synced);
                    SyncNotification::RemoteSaved { submission }
                }
                Err(error) => {
                    tracing::warn!(submission, "Failed to save settings remotely: {}", error);
                    sync_state.send_replace(SyncState::Error);
                    SyncNotification::RemoteFailed {
                        submission,
                        error: describe_remote_error(&error),
                    }
                }
            };
            let _ = notifications.send(notification);
        });

        Some(submission)
    }

    fn notify(&self, notification: SyncNotification) {
        let _ = self.notifications.send(notification);
    }
}

fn describe_remote_error(error: &RemoteSyncError) -> String {
    match error {
        RemoteSyncError::Http(inner) if inner.is_connect() || inner.is_timeout() => {
            format!("Network unreachable: {inner}")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::models::{AlarmSound, NumericField, SettingsEdit};
    use crate::storage::{MemorySettingsRepository, SettingsRepository};

    /// Remote whose pushes block until the test releases them.
    #[derive(Clone)]
    struct GatedRemote {
        pushed: Arc<Mutex<Vec<Settings>>>,
        stored: Arc<Mutex<Option<Settings>>>,
        gate: Arc<Semaphore>,
        fail: bool,
    }

    impl Default for GatedRemote {
        fn default() -> Self {
            Self {
                pushed: Arc::default(),
                stored: Arc::default(),
                gate: Arc::new(Semaphore::new(0)),
                fail: false,
            }
        }
    }

    impl GatedRemote {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn release(&self, pushes: usize) {
            self.gate.add_permits(pushes);
        }

        fn pushed(&self) -> Vec<Settings> {
            self.pushed.lock().unwrap().clone()
        }
    }

    impl SettingsRemote for GatedRemote {
        fn push_settings(
            &self,
            settings: &Settings,
        ) -> impl Future<Output = RemoteResult<()>> + Send {
            let pushed = Arc::clone(&self.pushed);
            let gate = Arc::clone(&self.gate);
            let settings = settings.clone();
            let fail = self.fail;
            async move {
                pushed.lock().unwrap().push(settings);
                gate.acquire().await.unwrap().forget();
                if fail {
                    Err(RemoteSyncError::Api {
                        status: 500,
                        message: "Failed to save settings (500)".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }

        fn fetch_settings(&self) -> impl Future<Output = RemoteResult<Option<Settings>>> + Send {
            let stored = self.stored.lock().unwrap().clone();
            async move { Ok(stored) }
        }
    }

    fn sync_with(
        remote: Option<GatedRemote>,
        repository: MemorySettingsRepository,
    ) -> (
        SettingsSync<GatedRemote>,
        mpsc::UnboundedReceiver<SyncNotification>,
    ) {
        let store = SettingsStore::open(Arc::new(repository));
        SettingsSync::new(store, remote, Handle::current())
    }

    #[tokio::test]
    async fn closing_clean_session_changes_nothing() {
        let remote = GatedRemote::default();
        let (sync, mut notifications) =
            sync_with(Some(remote.clone()), MemorySettingsRepository::new());
        let before = sync.snapshot();

        let draft = sync.open_session();
        assert_eq!(sync.close_session(draft, true), CommitResult::Unchanged);

        tokio::task::yield_now().await;
        assert_eq!(sync.snapshot(), before);
        assert!(remote.pushed().is_empty());
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn dirty_close_commits_before_remote_responds() {
        let remote = GatedRemote::default();
        let repository = MemorySettingsRepository::new();
        let (sync, mut notifications) = sync_with(Some(remote.clone()), repository.clone());

        let mut draft = sync.open_session();
        draft.apply(SettingsEdit::Volume(0.5));
        draft.apply(SettingsEdit::AlarmSound(AlarmSound::Digital));
        let result = sync.close_session(draft, true);

        assert_eq!(result, CommitResult::Committed { submission: Some(1) });
        let committed = sync.snapshot();
        assert!((committed.volume - 0.5).abs() < f64::EPSILON);
        assert_eq!(committed.alarm_sound, AlarmSound::Digital);
        assert_eq!(repository.load().unwrap(), Some(committed.clone()));
        assert_eq!(*sync.sync_state().borrow(), SyncState::Syncing);

        remote.release(1);
        assert_eq!(
            notifications.recv().await,
            Some(SyncNotification::RemoteSaved { submission: 1 })
        );
        assert_eq!(remote.pushed(), vec![committed]);
        assert_eq!(*sync.sync_state().borrow(), SyncState::Synced);
    }

    #[tokio::test]
    async fn failed_submission_keeps_local_commit() {
        let remote = GatedRemote::failing();
        let (sync, mut notifications) =
            sync_with(Some(remote.clone()), MemorySettingsRepository::new());

        let mut draft = sync.open_session();
        draft.apply(SettingsEdit::Numeric(
            NumericField::PomodoroTime,
            "50".to_string(),
        ));
        sync.close_session(draft, true);
        remote.release(1);

        let notification = notifications.recv().await.unwrap();
        assert!(matches!(
            notification,
            SyncNotification::RemoteFailed { submission: 1, .. }
        ));
        assert_eq!(sync.snapshot().pomodoro_time, 50);
        assert_eq!(*sync.sync_state().borrow(), SyncState::Error);
    }

    #[tokio::test]
    async fn unauthenticated_close_stays_local() {
        let remote = GatedRemote::default();
        let (sync, mut notifications) =
            sync_with(Some(remote.clone()), MemorySettingsRepository::new());

        let mut draft = sync.open_session();
        draft.apply(SettingsEdit::AutoStartBreaks(true));
        assert_eq!(
            sync.close_session(draft, false),
            CommitResult::Committed { submission: None }
        );

        tokio::task::yield_now().await;
        assert!(sync.snapshot().auto_start_breaks);
        assert!(remote.pushed().is_empty());
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn reset_then_close_commits_defaults_and_normalizes_empty_fields() {
        let repository = MemorySettingsRepository::with_settings(Settings {
            pomodoro_time: 60,
            volume: 0.2,
            ..Settings::default()
        });
        let (sync, _notifications) = sync_with(None, repository);

        let mut draft = sync.open_session();
        draft.reset_to_defaults();
        sync.close_session(draft, false);
        assert_eq!(sync.snapshot(), Settings::default());

        let mut draft = sync.open_session();
        draft.apply(SettingsEdit::Numeric(
            NumericField::ShortBreakTime,
            String::new(),
        ));
        sync.close_session(draft, false);
        assert_eq!(sync.snapshot().short_break_time, 1);
    }

    #[tokio::test]
    async fn each_dirty_close_gets_its_own_submission() {
        let remote = GatedRemote::default();
        let (sync, mut notifications) =
            sync_with(Some(remote.clone()), MemorySettingsRepository::new());

        for minutes in ["30", "35"] {
            let mut draft = sync.open_session();
            draft.apply(SettingsEdit::Numeric(
                NumericField::PomodoroTime,
                minutes.to_string(),
            ));
            sync.close_session(draft, true);
        }
        assert_eq!(sync.snapshot().pomodoro_time, 35);

        remote.release(2);

        let mut submissions = vec![];
        for _ in 0..2 {
            match notifications.recv().await.unwrap() {
                SyncNotification::RemoteSaved { submission } => submissions.push(submission),
                other => panic!("unexpected notification: {other:?}"),
            }
        }
        submissions.sort_unstable();
        assert_eq!(submissions, vec![1, 2]);
        assert_eq!(remote.pushed().len(), 2);
    }

    #[tokio::test]
    async fn reconcile_adopts_remote_or_pushes_local() {
        let remote = GatedRemote::default();
        let account_settings = Settings {
            long_break_time: 30,
            ..Settings::default()
        };
        *remote.stored.lock().unwrap() = Some(account_settings.clone());
        let (sync, _notifications) =
            sync_with(Some(remote.clone()), MemorySettingsRepository::new());

        assert_eq!(
            sync.reconcile_on_sign_in().await.unwrap(),
            ReconcileOutcome::AdoptedRemote
        );
        assert_eq!(sync.snapshot(), account_settings);

        *remote.stored.lock().unwrap() = None;
        remote.release(1);
        assert_eq!(
            sync.reconcile_on_sign_in().await.unwrap(),
            ReconcileOutcome::PushedLocal
        );
        assert_eq!(remote.pushed(), vec![account_settings]);

        sync.on_sign_out();
        assert_eq!(*sync.sync_state().borrow(), SyncState::Offline);
        assert_eq!(sync.snapshot().long_break_time, 30);
    }

    #[tokio::test]
    async fn reconcile_without_remote_is_offline() {
        let (sync, _notifications) = sync_with(None, MemorySettingsRepository::new());
        assert_eq!(
            sync.reconcile_on_sign_in().await.unwrap(),
            ReconcileOutcome::Offline
        );
    }
}

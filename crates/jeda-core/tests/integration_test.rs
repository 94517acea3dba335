//! Integration tests for jeda-core
//!
//! These run the HTTP clients and settings sync against a local test server:
//! - Settings push and fetch with the session cookie
//! - Statistics endpoints
//! - Auth session lifecycle
//! - Local-first commit followed by the background remote save

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jeda_core::api::{ApiClient, RemoteSyncError};
use jeda_core::auth::{
    AuthClient, AuthSession, AuthUser, MemorySessionStore, SessionError, SessionPersistence,
    SessionProvider, SocialProvider,
};
use jeda_core::config::ClientConfig;
use jeda_core::models::{AlarmSound, Backsound, NumericField, Settings, SettingsEdit};
use jeda_core::settings::{CommitResult, ReconcileOutcome, SettingsStore, SettingsSync, SyncNotification};
use jeda_core::storage::{JsonFileSettingsRepository, SettingsRepository};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::runtime::Handle;

const VALID_TOKEN: &str = "valid-token";

#[derive(Default)]
struct ServerState {
    settings: Option<Value>,
    settings_posts: usize,
    signed_out: bool,
}

type SharedState = Arc<Mutex<ServerState>>;

fn has_valid_cookie(headers: &HeaderMap) -> bool {
    headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookie| cookie.contains(&format!("ba_.session_token={VALID_TOKEN}")))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
}

async fn get_settings(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !has_valid_cookie(&headers) {
        return unauthorized();
    }
    let stored = state.lock().unwrap().settings.clone();
    match stored {
        Some(settings) => Json(settings).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Settings not found" })),
        )
            .into_response(),
    }
}

async fn post_settings(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !has_valid_cookie(&headers) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap();
    state.settings = Some(body);
    state.settings_posts += 1;
    Json(json!({ "success": true })).into_response()
}

async fn stats_summary(headers: HeaderMap) -> Response {
    if !has_valid_cookie(&headers) {
        return unauthorized();
    }
    Json(json!({
        "hoursSpent": 12.5,
        "daysAccessed": 9,
        "currentStreak": 3,
        "lastActive": "2026-10-18T09:30:00Z",
        "username": "tomato",
        "avatarUrl": null
    }))
    .into_response()
}

#[derive(Deserialize)]
struct RankingsQuery {
    page: u32,
    limit: u32,
}

async fn stats_rankings(Query(query): Query<RankingsQuery>) -> Json<Value> {
    let first = u64::from((query.page - 1) * query.limit) + 1;
    Json(json!({
        "users": [
            { "id": format!("user-{first}"), "username": "first", "totalFocusTime": 7260, "streak": 4 },
            { "id": format!("user-{}", first + 1), "username": "second", "avatarUrl": "https://cdn.example.com/a.png", "totalFocusTime": 60, "streak": 0 }
        ],
        "total": 51
    }))
}

async fn get_session(headers: HeaderMap) -> Response {
    if !has_valid_cookie(&headers) {
        return unauthorized();
    }
    Json(json!({
        "session": { "token": VALID_TOKEN, "expiresAt": "2099-01-01T00:00:00Z" },
        "user": { "id": "user-1", "name": "", "email": "tomato@example.com" }
    }))
    .into_response()
}

async fn sign_in_social(Json(body): Json<Value>) -> Json<Value> {
    let provider = body["provider"].as_str().unwrap_or_default().to_string();
    Json(json!({ "url": format!("https://auth.example.com/{provider}"), "redirect": true }))
}

async fn sign_out(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !has_valid_cookie(&headers) {
        return unauthorized();
    }
    state.lock().unwrap().signed_out = true;
    Json(json!({ "success": true })).into_response()
}

async fn spawn_server() -> (String, SharedState) {
    let state = SharedState::default();
    let app = Router::new()
        .route("/api/settings", get(get_settings).post(post_settings))
        .route("/api/stats/summary", get(stats_summary))
        .route("/api/stats/rankings", get(stats_rankings))
        .route("/api/auth/get-session", get(get_session))
        .route("/api/auth/sign-in/social", post(sign_in_social))
        .route("/api/auth/sign-out", post(sign_out))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{address}"), state)
}

fn api_client(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url).unwrap())
        .unwrap()
        .with_session_token(VALID_TOKEN)
}

#[tokio::test]
async fn settings_round_trip_through_api() {
    let (base_url, state) = spawn_server().await;
    let client = api_client(&base_url);

    assert_eq!(client.get_settings().await.unwrap(), None);

    let settings = Settings {
        pomodoro_time: 50,
        alarm_sound: AlarmSound::Kitchen,
        backsound: Backsound::TickingSlow,
        ..Settings::default()
    };
    client.post_settings(&settings).await.unwrap();

    let stored = state.lock().unwrap().settings.clone().unwrap();
    assert_eq!(stored["pomodoroTime"], json!(50));
    assert_eq!(stored["alarmSound"], json!("alarm-kitchen.mp3"));
    assert_eq!(stored["backsound"], json!("ticking-slow.mp3"));
    assert_eq!(client.get_settings().await.unwrap(), Some(settings));
}

#[tokio::test]
async fn missing_session_surfaces_api_error() {
    let (base_url, _state) = spawn_server().await;
    let client = ApiClient::new(ClientConfig::new(&base_url).unwrap()).unwrap();

    let error = client.post_settings(&Settings::default()).await.unwrap_err();
    match error {
        RemoteSyncError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized (401)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_settings_body_is_an_invalid_payload() {
    let (base_url, state) = spawn_server().await;
    state.lock().unwrap().settings = Some(json!("not a settings object"));

    let error = api_client(&base_url).get_settings().await.unwrap_err();
    assert!(matches!(error, RemoteSyncError::InvalidPayload(_)));
}

#[tokio::test]
async fn stats_endpoints_decode_summary_and_rankings() {
    let (base_url, _state) = spawn_server().await;
    let client = api_client(&base_url);

    let summary = client.fetch_summary().await.unwrap();
    assert_eq!(summary.username, "tomato");
    assert_eq!(summary.days_accessed, 9);
    assert_eq!(summary.last_active_label(), "2026-10-18");

    let page = client.fetch_rankings(3, 25).await.unwrap();
    assert_eq!(page.users[0].id, "user-51");
    assert_eq!(page.users[1].avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    assert_eq!(page.total_pages(25), 3);
}

#[tokio::test]
async fn auth_session_lifecycle() {
    let (base_url, state) = spawn_server().await;
    let store = MemorySessionStore::default();
    let auth = AuthClient::new(ClientConfig::new(&base_url).unwrap(), store.clone()).unwrap();

    assert!(!auth.is_authenticated().await);

    let sign_in = auth.sign_in_social(SocialProvider::Discord).await.unwrap();
    assert_eq!(sign_in.url, "https://auth.example.com/discord");

    let rejected = auth.complete_sign_in("stale-token").await.unwrap_err();
    assert!(matches!(rejected, SessionError::Api(_)));

    let session = auth.complete_sign_in(VALID_TOKEN).await.unwrap();
    assert_eq!(session.user.name, "tomato@example.com");
    assert!(auth.is_authenticated().await);
    assert_eq!(auth.session_or_signed_out().await, Some(session.clone()));
    assert_eq!(store.load_session().unwrap(), Some(session));

    auth.sign_out().await.unwrap();
    assert!(state.lock().unwrap().signed_out);
    assert_eq!(store.load_session().unwrap(), None);
    assert!(!auth.is_authenticated().await);
}

#[tokio::test]
async fn sign_out_clears_local_session_when_server_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let store = MemorySessionStore::default();
    store
        .save_session(&AuthSession {
            token: VALID_TOKEN.to_string(),
            expires_at: None,
            user: AuthUser {
                id: "user-1".to_string(),
                name: "tomato".to_string(),
                email: None,
                image: None,
            },
        })
        .unwrap();
    let auth = AuthClient::new(
        ClientConfig::new(format!("http://{address}")).unwrap(),
        store.clone(),
    )
    .unwrap();

    let error = auth.sign_out().await.unwrap_err();
    assert!(matches!(error, SessionError::Http(_)));
    assert_eq!(store.load_session().unwrap(), None);
    assert_eq!(auth.session_or_signed_out().await, None);
}

#[tokio::test]
async fn dirty_close_persists_locally_then_saves_remotely() {
    let (base_url, state) = spawn_server().await;
    let temp = TempDir::new().unwrap();
    let repository = JsonFileSettingsRepository::new(temp.path().join("settings.json"));
    let store = SettingsStore::open(Arc::new(repository.clone()));
    let (sync, mut notifications) =
        SettingsSync::new(store, Some(api_client(&base_url)), Handle::current());

    let mut draft = sync.open_session();
    draft.apply(SettingsEdit::Volume(0.5));
    draft.apply(SettingsEdit::AlarmSound(AlarmSound::Digital));
    draft.apply(SettingsEdit::Numeric(NumericField::LongBreakTime, String::new()));

    let result = sync.close_session(draft, true);
    assert_eq!(result, CommitResult::Committed { submission: Some(1) });

    let expected = Settings {
        volume: 0.5,
        alarm_sound: AlarmSound::Digital,
        long_break_time: 1,
        ..Settings::default()
    };
    assert_eq!(sync.snapshot(), expected);
    assert_eq!(repository.load().unwrap(), Some(expected.clone()));

    let notification = tokio::time::timeout(Duration::from_secs(5), notifications.recv())
        .await
        .unwrap();
    assert_eq!(notification, Some(SyncNotification::RemoteSaved { submission: 1 }));

    let posted = state.lock().unwrap().settings.clone().unwrap();
    assert_eq!(posted["volume"], json!(0.5));
    assert_eq!(posted["alarmSound"], json!("alarm-digital.mp3"));
    assert_eq!(posted["longBreakTime"], json!(1));
}

#[tokio::test]
async fn unreachable_server_keeps_local_commit() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let store = SettingsStore::open(Arc::new(
        jeda_core::storage::MemorySettingsRepository::new(),
    ));
    let (sync, mut notifications) = SettingsSync::new(
        store,
        Some(api_client(&format!("http://{address}"))),
        Handle::current(),
    );

    let mut draft = sync.open_session();
    draft.apply(SettingsEdit::AutoStartPomodoros(true));
    sync.close_session(draft, true);

    let notification = tokio::time::timeout(Duration::from_secs(5), notifications.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        notification,
        SyncNotification::RemoteFailed { submission: 1, .. }
    ));
    assert!(sync.snapshot().auto_start_pomodoros);
}

#[tokio::test]
async fn sign_in_reconciliation_adopts_clamped_remote_settings() {
    let (base_url, state) = spawn_server().await;
    state.lock().unwrap().settings = Some(json!({
        "pomodoroTime": 5000,
        "shortBreakTime": "7",
        "volume": 3,
        "alarmSound": "alarm-unknown.mp3",
        "alarmRepeat": 4
    }));

    let store = SettingsStore::open(Arc::new(
        jeda_core::storage::MemorySettingsRepository::new(),
    ));
    let (sync, _notifications) =
        SettingsSync::new(store, Some(api_client(&base_url)), Handle::current());

    let outcome = sync.reconcile_on_sign_in().await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::AdoptedRemote);

    let settings = sync.snapshot();
    assert_eq!(settings.pomodoro_time, 999);
    assert_eq!(settings.short_break_time, 7);
    assert!((settings.volume - 1.0).abs() < f64::EPSILON);
    assert_eq!(settings.alarm_sound, AlarmSound::Bell);
    assert_eq!(settings.alarm_repeat, 4);
    assert_eq!(state.lock().unwrap().settings_posts, 0);
}

#[tokio::test]
async fn sign_in_reconciliation_pushes_local_when_account_is_empty() {
    let (base_url, state) = spawn_server().await;
    let local = Settings {
        long_break_interval: 6,
        ..Settings::default()
    };
    let store = SettingsStore::open(Arc::new(
        jeda_core::storage::MemorySettingsRepository::with_settings(local.clone()),
    ));
    let (sync, _notifications) =
        SettingsSync::new(store, Some(api_client(&base_url)), Handle::current());

    let outcome = sync.reconcile_on_sign_in().await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::PushedLocal);

    let posted = state.lock().unwrap().settings.clone().unwrap();
    assert_eq!(posted["longBreakInterval"], json!(6));
    assert_eq!(sync.snapshot(), local);
}

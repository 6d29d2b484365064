// SPDX-License-Identifier: MIT

//! Shared test helpers: an in-process mock of the FinTrack backend plus
//! builders for auth-service harnesses and full test apps.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use fintrack_gateway::config::Config;
use fintrack_gateway::models::{Account, Category, Credentials, Transaction, UserProfile};
use fintrack_gateway::services::{ApiClient, AuthService};
use fintrack_gateway::store::{CollectionCache, Resettable, SessionStore};
use fintrack_gateway::AppState;

/// Programmable behavior of the mock backend.
pub struct BackendState {
    /// Number of probe (`GET /accounts`) calls received
    pub probe_calls: AtomicUsize,
    /// Status returned by the probe endpoint
    pub probe_status: AtomicU16,
    /// Artificial delay before the probe responds, in milliseconds
    pub probe_delay_ms: AtomicU64,
    /// Status returned by login/register (200 means accept)
    pub login_status: AtomicU16,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            probe_calls: AtomicUsize::new(0),
            probe_status: AtomicU16::new(200),
            probe_delay_ms: AtomicU64::new(0),
            login_status: AtomicU16::new(200),
        }
    }
}

#[allow(dead_code)]
pub fn test_user() -> UserProfile {
    UserProfile {
        user_id: "u-1".to_string(),
        email: "a@b.com".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        full_name: Some("Test User".to_string()),
    }
}

async fn mock_login(
    State(state): State<Arc<BackendState>>,
    Json(_credentials): Json<Credentials>,
) -> Response {
    match state.login_status.load(Ordering::SeqCst) {
        200 => Json(json!({ "token": "tok-1", "user": test_user() })).into_response(),
        401 => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid email or password" })),
        )
            .into_response(),
        status => (
            StatusCode::from_u16(status).expect("valid test status"),
            Json(json!({ "message": "backend unavailable" })),
        )
            .into_response(),
    }
}

async fn mock_register(State(state): State<Arc<BackendState>>) -> Response {
    match state.login_status.load(Ordering::SeqCst) {
        200 => (
            StatusCode::CREATED,
            Json(json!({ "message": "account created", "user": test_user() })),
        )
            .into_response(),
        status => (
            StatusCode::from_u16(status).expect("valid test status"),
            Json(json!({ "message": "email already registered" })),
        )
            .into_response(),
    }
}

async fn mock_accounts(State(state): State<Arc<BackendState>>) -> Response {
    state.probe_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.probe_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }

    match state.probe_status.load(Ordering::SeqCst) {
        200 => Json(json!([])).into_response(),
        status => (
            StatusCode::from_u16(status).expect("valid test status"),
            Json(json!({ "message": "probe rejected" })),
        )
            .into_response(),
    }
}

/// Spawn the mock backend on an ephemeral port, returning its base URL and
/// the shared behavior handle.
pub async fn spawn_backend() -> (String, Arc<BackendState>) {
    let state = Arc::new(BackendState::default());

    let app = Router::new()
        .route("/auth/login", post(mock_login))
        .route("/auth/register", post(mock_register))
        .route("/accounts", get(mock_accounts))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend serve");
    });

    (format!("http://{addr}"), state)
}

/// An auth service wired to the mock backend with an in-memory store and
/// registered feature caches.
#[allow(dead_code)]
pub struct TestHarness {
    pub auth: Arc<AuthService>,
    pub base_url: String,
    pub store: SessionStore,
    pub accounts: Arc<CollectionCache<Account>>,
    pub transactions: Arc<CollectionCache<Transaction>>,
    pub categories: Arc<CollectionCache<Category>>,
    pub backend: Arc<BackendState>,
}

fn test_config(api_base_url: &str) -> Config {
    Config {
        api_base_url: api_base_url.to_string(),
        http_timeout_secs: 2,
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn build_harness(api_base_url: &str, backend: Arc<BackendState>) -> TestHarness {
    build_harness_with_store(api_base_url, backend, SessionStore::new_mock())
}

#[allow(dead_code)]
pub fn build_harness_with_store(
    api_base_url: &str,
    backend: Arc<BackendState>,
    store: SessionStore,
) -> TestHarness {
    let api = ApiClient::new(&test_config(api_base_url)).expect("api client");

    let accounts = Arc::new(CollectionCache::new("accounts"));
    let transactions = Arc::new(CollectionCache::new("transactions"));
    let categories = Arc::new(CollectionCache::new("categories"));
    let resetters: Vec<Arc<dyn Resettable>> =
        vec![accounts.clone(), transactions.clone(), categories.clone()];

    TestHarness {
        auth: Arc::new(AuthService::new(api, store.clone(), resetters)),
        base_url: api_base_url.to_string(),
        store,
        accounts,
        transactions,
        categories,
        backend,
    }
}

/// Spawn a backend and build a harness against it.
#[allow(dead_code)]
pub async fn harness() -> TestHarness {
    let (base_url, backend) = spawn_backend().await;
    build_harness(&base_url, backend)
}

/// Harness pointed at an address nothing listens on: every call is a
/// connect failure ("no response at all").
#[allow(dead_code)]
pub fn offline_harness() -> TestHarness {
    build_harness("http://127.0.0.1:9", Arc::new(BackendState::default()))
}

/// Full test app: router + shared state + store + backend handle.
#[allow(dead_code)]
pub async fn test_app() -> (Router, Arc<AppState>, SessionStore, Arc<BackendState>) {
    let (base_url, backend) = spawn_backend().await;
    let store = SessionStore::new_mock();
    let config = test_config(&base_url);
    let api = ApiClient::new(&config).expect("api client");

    let accounts = Arc::new(CollectionCache::new("accounts"));
    let transactions = Arc::new(CollectionCache::new("transactions"));
    let categories = Arc::new(CollectionCache::new("categories"));
    let resetters: Vec<Arc<dyn Resettable>> =
        vec![accounts.clone(), transactions.clone(), categories.clone()];

    let auth = AuthService::new(api, store.clone(), resetters);
    auth.init();

    let state = Arc::new(AppState {
        config,
        auth,
        accounts,
        transactions,
        categories,
    });

    let app = fintrack_gateway::routes::create_router(state.clone());
    (app, state, store, backend)
}

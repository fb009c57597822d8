//! Profile controller flows against a real in-process HTTP server.
//!
//! The server mimics the calculator service's account endpoints, counts every
//! request, and can be told to fail specific calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use calcdesk_bff::*;
use calcdesk_client::{HttpProfileApi, MemoryStorage, SessionStorage, TOKEN_KEY};
use calcdesk_core::{PasswordChange, ProfileError, ProfileSettings, StrengthLevel, ValidationError, messages};
use calcdesk_flux::StateStore;

const GOOD_TOKEN: &str = "good-token";
const LOGIN_ROUTE: &str = "/static/login.html";

// =====================================================================
// Mock server
// =====================================================================

#[derive(Default)]
struct Hits {
    login: AtomicUsize,
    get_profile: AtomicUsize,
    put_profile: AtomicUsize,
    change_password: AtomicUsize,
    calculations: AtomicUsize,
}

/// Canned failures. `None` means the call succeeds.
#[derive(Default, Clone)]
struct Failures {
    get_profile: Option<(StatusCode, Value)>,
    put_profile: Option<(StatusCode, Value)>,
    change_password: Option<(StatusCode, Value)>,
    calculations: Option<(StatusCode, Value)>,
}

struct Mock {
    hits: Hits,
    failures: Mutex<Failures>,
    email: Mutex<String>,
    bio: Mutex<Option<String>>,
    updated_at: Mutex<Option<String>>,
    last_put: Mutex<Option<Value>>,
}

type Shared = Arc<Mock>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {}", GOOD_TOKEN)[..])
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, axum::Json(json!({"detail": "Could not validate credentials"}))).into_response()
}

fn profile_json(m: &Mock) -> Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": *m.email.lock().unwrap(),
        "bio": *m.bio.lock().unwrap(),
        "created_at": "2024-05-01T12:00:00",
        "profile_updated_at": *m.updated_at.lock().unwrap(),
    })
}

async fn login(State(m): State<Shared>, axum::Json(body): axum::Json<Value>) -> Response {
    m.hits.login.fetch_add(1, Ordering::SeqCst);
    if body["password"] == "correct-horse" {
        (StatusCode::OK, axum::Json(json!({"access_token": GOOD_TOKEN, "token_type": "bearer"}))).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, axum::Json(json!({"detail": "Incorrect email or password"}))).into_response()
    }
}

async fn get_profile(State(m): State<Shared>, headers: HeaderMap) -> Response {
    m.hits.get_profile.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some((status, body)) = m.failures.lock().unwrap().get_profile.clone() {
        return (status, axum::Json(body)).into_response();
    }
    axum::Json(profile_json(&m)).into_response()
}

async fn put_profile(
    State(m): State<Shared>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    m.hits.put_profile.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    *m.last_put.lock().unwrap() = Some(body.clone());
    if let Some((status, body)) = m.failures.lock().unwrap().put_profile.clone() {
        return (status, axum::Json(body)).into_response();
    }
    *m.email.lock().unwrap() = body["email"].as_str().unwrap_or_default().to_string();
    *m.bio.lock().unwrap() = body["bio"].as_str().map(str::to_string);
    *m.updated_at.lock().unwrap() = Some("2024-05-04T08:00:00".to_string());
    axum::Json(profile_json(&m)).into_response()
}

async fn change_password(State(m): State<Shared>, headers: HeaderMap) -> Response {
    m.hits.change_password.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some((status, body)) = m.failures.lock().unwrap().change_password.clone() {
        return (status, axum::Json(body)).into_response();
    }
    axum::Json(json!({"message": "Password changed successfully"})).into_response()
}

async fn calculations(State(m): State<Shared>, headers: HeaderMap) -> Response {
    m.hits.calculations.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some((status, body)) = m.failures.lock().unwrap().calculations.clone() {
        return (status, axum::Json(body)).into_response();
    }
    axum::Json(json!([
        {"id": 1, "a": 1, "b": 2, "type": "add", "result": 3},
        {"id": 2, "a": 6, "b": 3, "type": "divide", "result": 2},
        {"id": 3, "a": 2, "b": 5, "type": "multiply", "result": 10},
    ]))
    .into_response()
}

struct TestServer {
    base_url: String,
    mock: Shared,
}

async fn start_test_server(failures: Failures) -> TestServer {
    let mock = Arc::new(Mock {
        hits: Hits::default(),
        failures: Mutex::new(failures),
        email: Mutex::new("alice@example.com".to_string()),
        bio: Mutex::new(None),
        updated_at: Mutex::new(None),
        last_put: Mutex::new(None),
    });

    let app = Router::new()
        .route("/login", post(login))
        .route("/profile", get(get_profile).put(put_profile))
        .route("/change-password", post(change_password))
        .route("/calculations/", get(calculations))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        mock,
    }
}

// =====================================================================
// Controller setup
// =====================================================================

fn ten_days_in() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 11, 12, 0, 0).unwrap()
}

fn controller(base_url: &str, storage: Arc<MemoryStorage>) -> ProfileController {
    let settings = ProfileSettings {
        logout_delay_ms: 0,
        ..Default::default()
    };
    ProfileController::new(
        Arc::new(HttpProfileApi::new(base_url)),
        storage,
        Arc::new(StateStore::new()),
        settings,
    )
    .with_clock(ten_days_in)
}

fn signed_in() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_token(GOOD_TOKEN))
}

fn route(c: &ProfileController) -> Option<String> {
    c.store().get_as::<AppRoute>(AppRoute::PATH).map(|r| r.0)
}

fn alert(c: &ProfileController) -> Option<Alert> {
    c.store().get_as::<Alert>(Alert::PATH)
}

fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

fn password(current: &str, new: &str, confirm: &str) -> PasswordChange {
    PasswordChange {
        current_password: current.into(),
        new_password: new.into(),
        confirm_password: confirm.into(),
    }
}

// =====================================================================
// Page load
// =====================================================================

#[tokio::test]
async fn open_without_token_redirects_before_any_request() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, Arc::new(MemoryStorage::new()));

    assert_eq!(c.open().await.unwrap_err(), ProfileError::AuthExpired);
    assert_eq!(route(&c).as_deref(), Some(LOGIN_ROUTE));
    assert!(alert(&c).is_none());
    assert_eq!(hits(&server.mock.hits.get_profile), 0);
}

#[tokio::test]
async fn open_renders_profile_form_and_count() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    let profile = c.open().await.unwrap();
    assert_eq!(profile.username, "alice");

    let view = c.store().get_as::<ProfileView>(ProfileView::PATH).unwrap();
    assert_eq!(view.initials, "AL");
    assert_eq!(view.email, "alice@example.com");
    assert_eq!(view.member_since, "May 1, 2024");
    assert_eq!(view.member_days, 10);
    assert_eq!(view.last_updated, None);
    assert_eq!(view.update_count, None);

    let form = c.store().get_as::<ProfileFormState>(ProfileFormState::PATH).unwrap();
    assert_eq!(form.email, "alice@example.com");
    assert_eq!(form.bio, "");

    assert_eq!(
        c.store().get_as::<CalculationCount>(CalculationCount::PATH),
        Some(CalculationCount(3))
    );
    assert!(alert(&c).is_none());
    assert!(route(&c).is_none());
}

#[tokio::test]
async fn rejected_token_clears_session_without_alert() {
    let server = start_test_server(Failures::default()).await;
    let storage = Arc::new(MemoryStorage::with_token("stale-token"));
    let c = controller(&server.base_url, storage.clone());

    assert_eq!(c.open().await.unwrap_err(), ProfileError::AuthExpired);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(route(&c).as_deref(), Some(LOGIN_ROUTE));
    assert!(alert(&c).is_none());
    assert_eq!(hits(&server.mock.hits.calculations), 0);
}

#[tokio::test]
async fn profile_failure_alerts_and_skips_calculations() {
    let server = start_test_server(Failures {
        get_profile: Some((StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"}))),
        ..Default::default()
    })
    .await;
    let storage = signed_in();
    let c = controller(&server.base_url, storage.clone());

    let err = c.open().await.unwrap_err();
    assert!(matches!(err, ProfileError::ServerRejected { status: 500, .. }), "got: {:?}", err);

    let a = alert(&c).unwrap();
    assert_eq!(a.kind, AlertKind::Error);
    assert_eq!(a.message, messages::LOAD_FAILED);
    assert_eq!(a.display_for, std::time::Duration::from_secs(5));

    assert!(c.store().get(ProfileView::PATH).is_none());
    assert_eq!(hits(&server.mock.hits.calculations), 0);
    // The session survives a non-auth failure.
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
}

#[tokio::test]
async fn calculations_failure_is_silent() {
    let server = start_test_server(Failures {
        calculations: Some((StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "db down"}))),
        ..Default::default()
    })
    .await;
    let c = controller(&server.base_url, signed_in());

    assert!(c.open().await.is_ok());
    assert!(c.store().get(ProfileView::PATH).is_some());
    assert!(c.store().get(CalculationCount::PATH).is_none());
    assert!(alert(&c).is_none());
    assert_eq!(hits(&server.mock.hits.calculations), 1);
}

#[tokio::test]
async fn calculations_failure_keeps_previous_count() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());
    c.open().await.unwrap();

    server.mock.failures.lock().unwrap().calculations =
        Some((StatusCode::SERVICE_UNAVAILABLE, json!({})));
    assert_eq!(c.load_calculation_count().await, None);
    assert_eq!(
        c.store().get_as::<CalculationCount>(CalculationCount::PATH),
        Some(CalculationCount(3))
    );
}

// =====================================================================
// Profile update
// =====================================================================

#[tokio::test]
async fn invalid_email_is_rejected_locally() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    let err = c.update_profile("foo@bar", "bio").await.unwrap_err();
    assert_eq!(err, ProfileError::Validation(ValidationError::InvalidEmail));
    assert_eq!(alert(&c).unwrap().message, "Please enter a valid email address");
    assert_eq!(hits(&server.mock.hits.put_profile), 0);
}

#[tokio::test]
async fn successful_update_is_followed_by_exactly_one_reload() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());
    c.open().await.unwrap();
    assert_eq!(hits(&server.mock.hits.get_profile), 1);

    let updated = c.update_profile("  new@example.com ", "   ").await.unwrap();
    assert_eq!(updated.email, "new@example.com");

    assert_eq!(hits(&server.mock.hits.put_profile), 1);
    assert_eq!(hits(&server.mock.hits.get_profile), 2);

    // Trimmed email, empty bio sent as an explicit null.
    let sent = server.mock.last_put.lock().unwrap().clone().unwrap();
    assert_eq!(sent, json!({"email": "new@example.com", "bio": null}));

    let view = c.store().get_as::<ProfileView>(ProfileView::PATH).unwrap();
    assert_eq!(view.email, "new@example.com");
    assert_eq!(view.last_updated.as_deref(), Some("May 4, 2024"));
    assert_eq!(view.update_count.as_deref(), Some("1+"));

    let a = alert(&c).unwrap();
    assert_eq!(a.kind, AlertKind::Success);
    assert_eq!(a.message, messages::UPDATE_SUCCEEDED);
}

#[tokio::test]
async fn duplicate_email_gets_friendly_message() {
    let server = start_test_server(Failures {
        put_profile: Some((StatusCode::BAD_REQUEST, json!({"detail": "Email already registered"}))),
        ..Default::default()
    })
    .await;
    let c = controller(&server.base_url, signed_in());

    let err = c.update_profile("taken@example.com", "").await.unwrap_err();
    assert!(matches!(err, ProfileError::ServerRejected { status: 400, .. }));
    assert_eq!(alert(&c).unwrap().message, messages::EMAIL_IN_USE);
    assert_eq!(hits(&server.mock.hits.get_profile), 0);
}

#[tokio::test]
async fn update_without_detail_uses_fallback() {
    let server = start_test_server(Failures {
        put_profile: Some((StatusCode::INTERNAL_SERVER_ERROR, json!({}))),
        ..Default::default()
    })
    .await;
    let c = controller(&server.base_url, signed_in());

    c.update_profile("a@b.co", "hi").await.unwrap_err();
    assert_eq!(alert(&c).unwrap().message, messages::UPDATE_FAILED);
}

#[tokio::test]
async fn update_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = controller(&format!("http://{}", addr), signed_in());
    let err = c.update_profile("a@b.co", "").await.unwrap_err();
    assert!(matches!(err, ProfileError::Network(_)), "got: {:?}", err);
    assert_eq!(alert(&c).unwrap().message, messages::NETWORK);
}

#[tokio::test]
async fn update_unauthorized_keeps_session_and_shows_detail() {
    let server = start_test_server(Failures {
        put_profile: Some((StatusCode::UNAUTHORIZED, json!({"detail": "User not found"}))),
        ..Default::default()
    })
    .await;
    let storage = signed_in();
    let c = controller(&server.base_url, storage.clone());

    let err = c.update_profile("a@b.co", "").await.unwrap_err();
    assert!(matches!(err, ProfileError::ServerRejected { status: 401, .. }), "got: {:?}", err);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
    assert_eq!(alert(&c).unwrap().message, "User not found");
    assert!(route(&c).is_none());
    assert_eq!(hits(&server.mock.hits.get_profile), 0);
}

// =====================================================================
// Password change
// =====================================================================

#[tokio::test]
async fn unchanged_password_is_rejected_locally() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    let err = c
        .change_password(password("samepass1", "samepass1", "samepass1"))
        .await
        .unwrap_err();
    assert_eq!(err, ProfileError::Validation(ValidationError::PasswordUnchanged));
    assert_eq!(
        alert(&c).unwrap().message,
        "New password must be different from current password"
    );
    assert_eq!(hits(&server.mock.hits.change_password), 0);
}

#[tokio::test]
async fn validation_order_short_circuits() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    let err = c.change_password(password("", "x", "y")).await.unwrap_err();
    assert_eq!(err, ProfileError::Validation(ValidationError::MissingCurrentPassword));
    let err = c.change_password(password("old", "x", "y")).await.unwrap_err();
    assert_eq!(err, ProfileError::Validation(ValidationError::PasswordTooShort));
    let err = c.change_password(password("old", "longenough", "y")).await.unwrap_err();
    assert_eq!(err, ProfileError::Validation(ValidationError::PasswordMismatch));
    assert_eq!(hits(&server.mock.hits.change_password), 0);
}

#[tokio::test]
async fn wrong_current_password_message() {
    let server = start_test_server(Failures {
        change_password: Some((StatusCode::BAD_REQUEST, json!({"detail": "Current password is incorrect"}))),
        ..Default::default()
    })
    .await;
    let storage = signed_in();
    let c = controller(&server.base_url, storage.clone());

    c.change_password(password("wrongpass", "newpass123", "newpass123"))
        .await
        .unwrap_err();
    assert_eq!(alert(&c).unwrap().message, messages::PASSWORD_INCORRECT);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
}

#[tokio::test]
async fn unprocessable_password_ignores_detail() {
    let server = start_test_server(Failures {
        change_password: Some((
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"detail": [{"loc": ["body", "new_password"], "msg": "too short"}]}),
        )),
        ..Default::default()
    })
    .await;
    let c = controller(&server.base_url, signed_in());

    c.change_password(password("oldpass123", "newpass123", "newpass123"))
        .await
        .unwrap_err();
    assert_eq!(alert(&c).unwrap().message, messages::PASSWORD_INVALID);
}

#[tokio::test]
async fn password_unauthorized_keeps_session_and_shows_detail() {
    let server = start_test_server(Failures {
        change_password: Some((StatusCode::UNAUTHORIZED, json!({"detail": "User not found"}))),
        ..Default::default()
    })
    .await;
    let storage = signed_in();
    let c = controller(&server.base_url, storage.clone());

    let err = c
        .change_password(password("oldpass123", "newpass123", "newpass123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::ServerRejected { status: 401, .. }), "got: {:?}", err);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
    assert_eq!(alert(&c).unwrap().message, "User not found");
    assert!(route(&c).is_none());
}

#[tokio::test]
async fn password_change_ends_session() {
    let server = start_test_server(Failures::default()).await;
    let storage = signed_in();
    let c = controller(&server.base_url, storage.clone());

    c.change_password(password("oldpass123", "newpass123", "newpass123"))
        .await
        .unwrap();

    assert_eq!(hits(&server.mock.hits.change_password), 1);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(route(&c).as_deref(), Some(LOGIN_ROUTE));
    assert_eq!(alert(&c).unwrap().message, messages::PASSWORD_CHANGED);
    assert_eq!(
        c.store().get_as::<PasswordFormCleared>(PasswordFormCleared::PATH),
        Some(PasswordFormCleared)
    );
}

#[tokio::test]
async fn strength_indicator_follows_input() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    assert_eq!(c.password_input("abcdefgh"), Some(StrengthLevel::Weak));
    assert_eq!(c.password_input("abcdefghijkl"), Some(StrengthLevel::Medium));
    assert_eq!(c.password_input("Abcdefgh1!"), Some(StrengthLevel::Strong));
    assert_eq!(
        c.store().get_as::<StrengthIndicator>(StrengthIndicator::PATH),
        Some(StrengthIndicator(Some(StrengthLevel::Strong)))
    );
    assert_eq!(c.password_input(""), None);
    assert_eq!(
        c.store().get_as::<StrengthIndicator>(StrengthIndicator::PATH),
        Some(StrengthIndicator(None))
    );
}

// =====================================================================
// Session lifecycle
// =====================================================================

#[tokio::test]
async fn login_then_logout() {
    let server = start_test_server(Failures::default()).await;
    let storage = Arc::new(MemoryStorage::new());
    let c = controller(&server.base_url, storage.clone());

    let session = c.login(" alice@example.com ", "correct-horse").await.unwrap();
    assert_eq!(session.token(), GOOD_TOKEN);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
    assert!(c.open().await.is_ok());

    c.logout().unwrap();
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(route(&c).as_deref(), Some(LOGIN_ROUTE));
}

#[tokio::test]
async fn failed_login_keeps_no_session() {
    let server = start_test_server(Failures::default()).await;
    let storage = Arc::new(MemoryStorage::new());
    let c = controller(&server.base_url, storage.clone());

    let err = c.login("alice@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, ProfileError::ServerRejected { status: 401, .. }));
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(alert(&c).unwrap().message, "Incorrect email or password");
    assert_eq!(hits(&server.mock.hits.login), 1);
}

#[tokio::test]
async fn dismiss_alert_removes_banner() {
    let server = start_test_server(Failures::default()).await;
    let c = controller(&server.base_url, signed_in());

    c.update_profile("bad", "").await.unwrap_err();
    assert!(alert(&c).is_some());
    c.dismiss_alert();
    assert!(alert(&c).is_none());
}

//! Session guard integration tests
//!
//! Runs the guard against a mock authentication service and checks:
//! - no network traffic without stored credentials
//! - a rejected or unreachable verification clears the session
//! - profile refresh is best-effort
//! - logout always clears locally

use std::sync::Arc;

use farmflow_client::geolocation::NoGeolocation;
use farmflow_client::storage::{MemoryStorage, SessionStorage, SessionStore, TOKEN_KEY};
use farmflow_client::{Config, Dashboard};
use serde_json::json;
use shared::{Route, Session, UnauthenticatedReason, User};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dashboard(base_url: &str, store: SessionStore) -> Dashboard {
    let config = Config::for_base_url(base_url, "unused/session.json");
    Dashboard::build(config, store, Arc::new(NoGeolocation)).unwrap()
}

fn signed_in_store() -> SessionStore {
    let store = SessionStore::in_memory();
    store
        .save(&Session::new("tok-123", User::new("Asha", "asha@farm.in")))
        .unwrap();
    store
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_missing_session_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri(), SessionStore::in_memory());
    let err = dashboard.guard.verify_session().await.unwrap_err();

    assert_eq!(err.reason, UnauthenticatedReason::MissingCredentials);
    assert_eq!(err.redirect_to(), Route::Landing);
}

#[tokio::test]
async fn test_token_without_user_record_is_not_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "tok-123").unwrap();
    let store = SessionStore::new(storage);
    let dashboard = dashboard(&server.uri(), store.clone());

    let err = dashboard.guard.verify_session().await.unwrap_err();
    assert_eq!(err.reason, UnauthenticatedReason::MissingCredentials);
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_rejected_token_clears_session_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store();
    let dashboard = dashboard(&server.uri(), store.clone());
    let err = dashboard.guard.verify_session().await.unwrap_err();

    assert_eq!(err.reason, UnauthenticatedReason::Rejected { status: 401 });
    assert!(store.load().is_none());
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_server_error_during_verification_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store();
    let dashboard = dashboard(&server.uri(), store.clone());
    let err = dashboard.guard.verify_session().await.unwrap_err();

    assert_eq!(err.reason, UnauthenticatedReason::Rejected { status: 503 });
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_unreachable_auth_service_clears_session() {
    let store = signed_in_store();
    let dashboard = dashboard("http://127.0.0.1:1", store.clone());

    let err = dashboard.guard.verify_session().await.unwrap_err();

    assert!(matches!(
        err.reason,
        UnauthenticatedReason::VerificationUnreachable { .. }
    ));
    assert!(store.load().is_none());
}

// ============================================================================
// Profile refresh
// ============================================================================

#[tokio::test]
async fn test_verified_session_refreshes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Asha Devi",
            "email": "asha@farm.in",
            "profile": {"nitrogen": 40, "phosphorus": "25", "potassium": 30, "crop": "Wheat"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store();
    let dashboard = dashboard(&server.uri(), store.clone());
    let verified = dashboard.guard.verify_session().await.unwrap();

    assert_eq!(verified.session.token, "tok-123");
    assert_eq!(verified.session.user.name, "Asha Devi");
    assert_eq!(verified.defaults.crop_type.as_deref(), Some("Wheat"));
    assert_eq!(verified.defaults.nitrogen.as_deref(), Some("40"));
    assert_eq!(verified.defaults.phosphorous.as_deref(), Some("25"));
    assert_eq!(store.load().unwrap().user.name, "Asha Devi");
}

#[tokio::test]
async fn test_profile_failure_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verify-token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = signed_in_store();
    let dashboard = dashboard(&server.uri(), store.clone());
    let verified = dashboard.guard.verify_session().await.unwrap();

    assert_eq!(verified.session.user.name, "Asha");
    assert!(verified.defaults.is_empty());
    assert!(store.load().is_some());
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session_even_if_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store();
    let dashboard = dashboard(&server.uri(), store.clone());

    assert_eq!(dashboard.guard.logout().await, Route::Landing);
    assert!(store.load().is_none());
    assert!(store.token().is_none());
}

#[tokio::test]
async fn test_logout_without_token_skips_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri(), SessionStore::in_memory());
    assert_eq!(dashboard.guard.logout().await, Route::Landing);
}

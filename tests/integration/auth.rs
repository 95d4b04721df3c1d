use crate::common;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;
use userhub::domain::users::UserRole;
use userhub::infrastructure::config::HttpConfig;

#[tokio::test]
async fn test_login_success() {
    let (state, stores) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Owner).await;
    let app = common::app(state);

    let data = common::login(&app, "a@x.com", "p1").await;

    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["token_type"], "bearer");
    assert_eq!(data["expires_in"], 900);
    assert_eq!(stores.refresh_tokens.all().len(), 1);
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let (state, _) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let mut details = Vec::new();
    for (email, password) in [("a@x.com", "wrong"), ("nobody@x.com", "p1")] {
        let response = common::send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
        details.push(common::body_json(response).await["errors"][0]["detail"].clone());
    }

    assert_eq!(details[0], details[1]);
}

#[tokio::test]
async fn test_login_inactive_account() {
    let (state, stores) = common::memory_state();
    let user = common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    stores.users.set_active(user.id, false).unwrap();
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "p1" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_validation_error() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = common::body_json(response).await;
    let detail = json["errors"][0]["detail"].as_str().unwrap();
    assert!(detail.contains("email"));
    assert!(detail.contains("password"));
}

#[tokio::test]
async fn test_login_store_unavailable() {
    let (state, stores) = common::memory_state();
    stores.users.set_unavailable(true);
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "p1" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_refresh_is_single_use() {
    let (state, _) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let first = common::login(&app, "a@x.com", "p1").await;
    let original = first["refresh_token"].as_str().unwrap();

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": original })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = common::body_json(response).await["data"].clone();
    assert_ne!(second["refresh_token"], first["refresh_token"]);

    let replay = common::send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": original })),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    // The rotated token still works
    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": second["refresh_token"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let (state, stores) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let tokens = common::login(&app, "a@x.com", "p1").await;
    let body = json!({ "refresh_token": tokens["refresh_token"] });

    let response = common::send(&app, "POST", "/api/v1/auth/logout", None, Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(stores.refresh_tokens.all().is_empty());

    // Logging out twice is not an error
    let response = common::send(&app, "POST", "/api/v1/auth/logout", None, Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = common::send(&app, "POST", "/api/v1/auth/refresh", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_returns_claims() {
    let (state, _) = common::memory_state();
    let user = common::create_user(&state, "a@x.com", "p1", UserRole::Broker).await;
    let app = common::app(state);

    let tokens = common::login(&app, "a@x.com", "p1").await;
    let response = common::send(
        &app,
        "GET",
        "/api/v1/auth/verify",
        tokens["access_token"].as_str(),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["sub"], user.id.to_string());
    assert_eq!(json["data"]["role"], "broker");
    assert_eq!(json["data"]["email"], "a@x.com");
    assert_eq!(json["data"]["preferred_language"], "en");
    assert_eq!(json["data"]["type"], "access");
}

#[tokio::test]
async fn test_verify_rejects_bad_tokens() {
    let (state, _) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let response = common::send(&app, "GET", "/api/v1/auth/verify", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::send(&app, "GET", "/api/v1/auth/verify", Some("garbage"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A refresh token is not accepted where an access token is required
    let tokens = common::login(&app, "a@x.com", "p1").await;
    let response = common::send(
        &app,
        "GET",
        "/api/v1/auth/verify",
        tokens["refresh_token"].as_str(),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let (state, _) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let tokens = common::login(&app, "a@x.com", "p1").await;
    let access = tokens["access_token"].as_str();

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/change-password",
        access,
        Some(json!({ "old_password": "wrong", "new_password": "p2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    common::login(&app, "a@x.com", "p1").await;

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/change-password",
        access,
        Some(json!({ "old_password": "p1", "new_password": "p2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    common::login(&app, "a@x.com", "p2").await;
    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "p1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_requires_token() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/change-password",
        None,
        Some(json!({ "old_password": "p1", "new_password": "p2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_is_rate_limited() {
    let (state, _) = common::memory_state();
    let app = userhub::presentation::router::app(
        state,
        &HttpConfig {
            cors_allowed_origins: String::new(),
            rate_limit_per_minute: 2,
        },
    )
    .unwrap();

    let body = json!({ "email": "nobody@x.com", "password": "p1" });
    for _ in 0..2 {
        let response =
            common::send(&app, "POST", "/api/v1/auth/login", None, Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = common::send(&app, "POST", "/api/v1/auth/login", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
#[serial]
async fn test_session_flow_against_postgres() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let (state, _) = common::postgres_state(pool.clone());
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({
            "email": "a@x.com",
            "password": "p1",
            "full_name": "Abebe Kebede",
            "phone_number": "+251911234567"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let tokens = common::login(&app, "a@x.com", "p1").await;
    let original = tokens["refresh_token"].clone();

    let response = common::send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": original })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let replay = common::send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": original })),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}

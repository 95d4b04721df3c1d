use crate::common;

use axum::http::StatusCode;
use serde_json::json;
use userhub::domain::users::{UserRepository, UserRole};

fn registration(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": "p1",
        "full_name": "Abebe Kebede",
        "role": "owner",
        "phone_number": "+251911234567",
        "preferred_language": "am",
        "preferred_currency": "USD"
    })
}

#[tokio::test]
async fn test_register_user() {
    let (state, stores) = common::memory_state();
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(registration("a@x.com")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["email"], "a@x.com");
    assert_eq!(json["data"]["role"], "owner");
    assert_eq!(json["data"]["phone_number"], "+251911234567");
    assert_eq!(json["data"]["preferred_language"], "am");
    assert_eq!(json["data"]["preferred_currency"], "USD");
    assert_eq!(json["data"]["is_active"], true);
    assert!(json["data"].get("password_hash").is_none());

    // Phone is stored encrypted
    let stored = stores.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.phone_number.as_deref(), Some("+251911234567"));

    common::login(&app, "a@x.com", "p1").await;
}

#[tokio::test]
async fn test_register_defaults() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "email": "b@x.com", "password": "p1", "full_name": "B" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["role"], "tenant");
    assert_eq!(json["data"]["preferred_language"], "en");
    assert_eq!(json["data"]["preferred_currency"], "ETB");
    assert!(json["data"].get("phone_number").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let first = common::send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(registration("a@x.com")),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = common::send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(registration("a@x.com")),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_as_admin_forbidden() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let mut body = registration("a@x.com");
    body["role"] = json!("admin");

    let response = common::send(&app, "POST", "/api/v1/users/register", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_invalid_phone() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let mut body = registration("a@x.com");
    body["phone_number"] = json!("0911234567");

    let response = common::send(&app, "POST", "/api/v1/users/register", None, Some(body)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_and_update_me() {
    let (state, _) = common::memory_state();
    common::create_user(&state, "a@x.com", "p1", UserRole::Tenant).await;
    let app = common::app(state);

    let tokens = common::login(&app, "a@x.com", "p1").await;
    let access = tokens["access_token"].as_str();

    let response = common::send(&app, "GET", "/api/v1/users/me", access, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["email"], "a@x.com");
    assert_eq!(json["data"]["full_name"], "Test User");

    let response = common::send(
        &app,
        "PUT",
        "/api/v1/users/me",
        access,
        Some(json!({ "full_name": "Renamed", "phone_number": "+251711234567" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Renamed");
    assert_eq!(json["data"]["phone_number"], "+251711234567");
    assert_eq!(json["data"]["preferred_currency"], "ETB");
}

#[tokio::test]
async fn test_me_requires_token() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(&app, "GET", "/api/v1/users/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

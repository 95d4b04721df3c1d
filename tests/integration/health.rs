use crate::common;

use axum::http::StatusCode;
use serial_test::serial;

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = common::body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
#[serial]
async fn test_health_with_database() {
    let pool = setup_test_db_or_skip!();

    let (state, _) = common::postgres_state(pool);
    let app = common::app(state);

    let response = common::send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (state, _) = common::memory_state();
    let app = common::app(state);

    let response = common::send(&app, "GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert!(json["paths"]["/api/v1/auth/login"].is_object());
}

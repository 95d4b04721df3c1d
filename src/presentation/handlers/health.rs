use crate::infrastructure::db::DbPool;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Liveness plus a round trip to the database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<DbPool>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected"
                })),
            )
        }
    }
}

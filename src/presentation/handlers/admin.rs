use crate::application::users::get::GetUserUseCase;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::UserResource;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Look up any user; admin only
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = GetUserUseCase::new(state.user_repo).execute(id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(UserResource::from_user(
            user,
            state.cipher.as_ref(),
        ))),
    ))
}

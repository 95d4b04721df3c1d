use crate::application::users::get::GetUserUseCase;
use crate::application::users::register::{RegisterUserRequest, RegisterUserUseCase};
use crate::application::users::update_profile::{UpdateProfileRequest, UpdateProfileUseCase};
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::UserResource;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResource>),
        (status = 403, description = "Admin role requested", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RegisterUserUseCase::new(
        state.user_repo,
        state.password_service,
        state.cipher.clone(),
    );

    let user = use_case.execute(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(UserResource::from_user(
            user,
            state.cipher.as_ref(),
        ))),
    ))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = GetUserUseCase::new(state.user_repo)
        .execute(auth_user.user_id()?)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(UserResource::from_user(
            user,
            state.cipher.as_ref(),
        ))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UpdateProfileUseCase::new(state.user_repo, state.cipher.clone())
        .execute(auth_user.user_id()?, req)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(UserResource::from_user(
            user,
            state.cipher.as_ref(),
        ))),
    ))
}

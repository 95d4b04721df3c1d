use crate::application::auth::change_password::{ChangePasswordRequest, ChangePasswordUseCase};
use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::{LogoutRequest, LogoutUseCase};
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use crate::application::auth::token_utils::TokenResponse;
use crate::application::password_reset::request::{
    ForgotPasswordRequest, RequestPasswordResetUseCase,
};
use crate::application::password_reset::reset::{ResetPasswordRequest, ResetPasswordUseCase};
use crate::domain::auth::AccessClaims;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{ApiResponse, MessageResponse};
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Login handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Inactive account", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LoginUseCase::new(
        state.user_repo,
        state.refresh_token_repo,
        state.token_service,
        state.password_service,
        state.cipher,
    );

    let response = use_case.execute(req).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Refresh token handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RefreshTokenUseCase::new(
        state.refresh_token_repo,
        state.user_repo,
        state.token_service,
        state.cipher,
    );

    let response = use_case.execute(req).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Logout handler; unknown tokens are accepted
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<MessageResponse>),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    LogoutUseCase::new(state.refresh_token_repo)
        .execute(req)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(MessageResponse::new("Successfully logged out"))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Missing token or wrong old password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth_user.user_id()?;

    ChangePasswordUseCase::new(state.user_repo, state.password_service)
        .execute(user_id, req)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(MessageResponse::new(
            "Password changed successfully",
        ))),
    ))
}

/// Returns the claims of a valid access token
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    responses(
        (status = 200, description = "Session is valid", body = ApiResponse<AccessClaims>),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn verify(auth_user: AuthUser) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::new(auth_user.claims)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = ApiResponse<MessageResponse>),
        (status = 404, description = "No user with this email", body = ErrorResponse),
        (status = 502, description = "Email could not be delivered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    RequestPasswordResetUseCase::new(
        state.user_repo,
        state.reset_token_repo,
        state.token_service,
        state.email_sender,
        state.frontend_url,
    )
    .execute(req)
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(MessageResponse::new(
            "Password reset link sent to your email",
        ))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Invalid, expired or used token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    ResetPasswordUseCase::new(
        state.user_repo,
        state.reset_token_repo,
        state.token_service,
        state.password_service,
    )
    .execute(req)
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(MessageResponse::new(
            "Password has been reset successfully",
        ))),
    ))
}

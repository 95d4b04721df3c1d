use crate::application::auth::change_password::ChangePasswordRequest;
use crate::application::auth::login::LoginRequest;
use crate::application::auth::logout::LogoutRequest;
use crate::application::auth::refresh::RefreshTokenRequest;
use crate::application::auth::token_utils::TokenResponse;
use crate::application::password_reset::request::ForgotPasswordRequest;
use crate::application::password_reset::reset::ResetPasswordRequest;
use crate::application::users::register::RegisterUserRequest;
use crate::application::users::update_profile::UpdateProfileRequest;
use crate::domain::auth::AccessClaims;
use crate::domain::users::{Currency, Language, UserRole};
use crate::presentation::dtos::UserResource;
use crate::shared::error::{ErrorObject, ErrorResponse};
use crate::shared::response::{ApiResponse, MessageResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userhub API",
        version = "0.1.0",
        description = "User accounts, sessions and password recovery"
    ),
    paths(
        crate::presentation::handlers::health::health_check,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::refresh_token,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::auth::change_password,
        crate::presentation::handlers::auth::verify,
        crate::presentation::handlers::auth::forgot_password,
        crate::presentation::handlers::auth::reset_password,
        crate::presentation::handlers::users::register,
        crate::presentation::handlers::users::get_me,
        crate::presentation::handlers::users::update_me,
        crate::presentation::handlers::admin::get_user,
    ),
    components(
        schemas(
            LoginRequest,
            RefreshTokenRequest,
            LogoutRequest,
            ChangePasswordRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            RegisterUserRequest,
            UpdateProfileRequest,
            TokenResponse,
            AccessClaims,
            UserResource,
            UserRole,
            Language,
            Currency,
            MessageResponse,
            ApiResponse<TokenResponse>,
            ApiResponse<UserResource>,
            ApiResponse<MessageResponse>,
            ApiResponse<AccessClaims>,
            ErrorResponse,
            ErrorObject,
        )
    ),
    tags(
        (name = "auth", description = "Sessions, tokens and password recovery"),
        (name = "users", description = "Registration and own profile"),
        (name = "admin", description = "Administrative lookups"),
        (name = "health", description = "Service health")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

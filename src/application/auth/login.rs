use crate::application::auth::token_utils::{TokenPair, TokenResponse};
use crate::domain::auth::{RefreshTokenRepository, TokenService};
use crate::domain::encryption::FieldCipher;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub type LoginResponse = TokenResponse;

pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_service: Arc<dyn TokenService>,
    password_service: Arc<dyn PasswordHashingService>,
    cipher: Arc<dyn FieldCipher>,
}

impl LoginUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_service: Arc<dyn TokenService>,
        password_service: Arc<dyn PasswordHashingService>,
        cipher: Arc<dyn FieldCipher>,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_service,
            password_service,
            cipher,
        }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&req.email)
            .await
            .map_err(|e| {
                tracing::error!("Database error finding user: {}", e);
                AppError::StoreError(e)
            })?
            .ok_or_else(|| {
                tracing::warn!("Login attempt for unknown email");
                AppError::InvalidCredentials
            })?;

        // Accounts without a local password never authenticate here
        let Some(password_hash) = user.password_hash.as_deref() else {
            tracing::warn!("Login attempt for user {} without a password", user.id);
            return Err(AppError::InvalidCredentials);
        };

        let valid_password = self
            .password_service
            .verify_password(&req.password, password_hash)
            .map_err(|e| {
                tracing::error!("Password verification internal error: {}", e);
                AppError::InternalServerError(e)
            })?;

        if !valid_password {
            tracing::warn!("Password verification failed for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!("Login attempt for inactive user {}", user.id);
            return Err(AppError::InactiveAccount);
        }

        let pair = TokenPair::issue(&user, self.token_service.as_ref(), self.cipher.as_ref())?;

        self.refresh_token_repo
            .create(pair.refresh_record(user.id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to store refresh token: {}", e);
                AppError::StoreError(e)
            })?;

        tracing::info!("User {} logged in", user.id);
        Ok(pair.into_response(self.token_service.as_ref()))
    }
}

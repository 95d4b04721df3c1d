use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::TokenService;
use crate::domain::password::PasswordHashingService;
use crate::domain::password_reset::{PasswordResetTokenRepository, ResetOutcome};
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Consumes a reset token and sets a new password
pub struct ResetPasswordUseCase {
    user_repo: Arc<dyn UserRepository>,
    reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
    token_service: Arc<dyn TokenService>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl ResetPasswordUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
        token_service: Arc<dyn TokenService>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            user_repo,
            reset_token_repo,
            token_service,
            password_service,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: ResetPasswordRequest) -> Result<(), AppError> {
        let signed = self
            .token_service
            .verify_reset_token(&req.token)
            .ok_or(AppError::InvalidToken)?;
        let user_id = signed.claims.user_id().map_err(|_| AppError::InvalidToken)?;

        let record = self
            .reset_token_repo
            .find_by_hash(&hash_token(&req.token))
            .await
            .map_err(AppError::StoreError)?
            .filter(|r| r.user_id == user_id && r.is_valid_at(OffsetDateTime::now_utc()))
            .ok_or_else(|| {
                tracing::warn!("Reset token already used or superseded");
                AppError::InvalidToken
            })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(AppError::StoreError)?
            .ok_or(AppError::NotFound)?;

        let new_hash = self
            .password_service
            .hash_password(&req.new_password)
            .map_err(AppError::InternalServerError)?;

        // Record delete and password write commit together; the delete is the single-use gate
        match self
            .reset_token_repo
            .reset_password(record.id, user.id, &new_hash)
            .await
            .map_err(AppError::StoreError)?
        {
            ResetOutcome::Applied => {}
            ResetOutcome::TokenUsed => return Err(AppError::InvalidToken),
            ResetOutcome::UserMissing => return Err(AppError::NotFound),
        }

        tracing::info!("Password reset for user {}", user.id);
        Ok(())
    }
}

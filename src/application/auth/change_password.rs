use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Outstanding refresh tokens are left untouched.
pub struct ChangePasswordUseCase {
    user_repo: Arc<dyn UserRepository>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl ChangePasswordUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            user_repo,
            password_service,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, user_id: Uuid, req: ChangePasswordRequest) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(AppError::StoreError)?
            .ok_or(AppError::InvalidToken)?;

        let Some(current_hash) = user.password_hash.as_deref() else {
            return Err(AppError::InvalidCredentials);
        };

        let valid = self
            .password_service
            .verify_password(&req.old_password, current_hash)
            .map_err(AppError::InternalServerError)?;
        if !valid {
            tracing::warn!("Incorrect old password for user {}", user_id);
            return Err(AppError::InvalidCredentials);
        }

        // Hash first: a hashing failure must leave the stored hash in place
        let new_hash = self
            .password_service
            .hash_password(&req.new_password)
            .map_err(AppError::InternalServerError)?;

        let updated = self
            .user_repo
            .update_password(user_id, &new_hash)
            .await
            .map_err(AppError::StoreError)?;
        if !updated {
            return Err(AppError::NotFound);
        }

        tracing::info!("Password changed for user {}", user_id);
        Ok(())
    }
}

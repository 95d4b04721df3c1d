use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::TokenService;
use crate::domain::email::EmailSender;
use crate::domain::password_reset::{NewPasswordResetToken, PasswordResetTokenRepository};
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
}

/// Issues a single-use reset token and emails it as a link.
///
/// Unknown emails yield `NotFound`, which does reveal whether an account exists.
pub struct RequestPasswordResetUseCase {
    user_repo: Arc<dyn UserRepository>,
    reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
    token_service: Arc<dyn TokenService>,
    email_sender: Arc<dyn EmailSender>,
    frontend_url: String,
}

impl RequestPasswordResetUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
        token_service: Arc<dyn TokenService>,
        email_sender: Arc<dyn EmailSender>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            user_repo,
            reset_token_repo,
            token_service,
            email_sender,
            frontend_url: frontend_url.into(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, token)
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: ForgotPasswordRequest) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(&req.email)
            .await
            .map_err(AppError::StoreError)?
            .ok_or(AppError::NotFound)?;

        let issued = self
            .token_service
            .issue_reset_token(user.id)
            .map_err(AppError::InternalServerError)?;

        // Only the newest reset link stays usable
        let superseded = self
            .reset_token_repo
            .delete_by_user_id(user.id)
            .await
            .map_err(AppError::StoreError)?;
        if superseded > 0 {
            tracing::debug!("Discarded {} older reset tokens", superseded);
        }

        self.reset_token_repo
            .create(NewPasswordResetToken {
                user_id: user.id,
                token_hash: hash_token(&issued.token),
                expires_at: issued.expires_at,
            })
            .await
            .map_err(AppError::StoreError)?;

        // Delivery is attempted once; the caller may simply ask again
        self.email_sender
            .send_password_reset_email(&user.email, &self.reset_link(&issued.token))
            .await
            .map_err(|e| {
                tracing::error!("Failed to send reset email to user {}: {}", user.id, e);
                AppError::EmailDeliveryError(e)
            })?;

        tracing::info!("Password reset requested for user {}", user.id);
        Ok(())
    }
}

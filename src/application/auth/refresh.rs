use crate::application::auth::token_utils::{TokenPair, TokenResponse, hash_token};
use crate::domain::auth::{RefreshTokenRepository, TokenService};
use crate::domain::encryption::FieldCipher;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

pub type RefreshTokenResponse = TokenResponse;

/// Exchanges a refresh token for a new pair. Each refresh token works once.
pub struct RefreshTokenUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    user_repo: Arc<dyn UserRepository>,
    token_service: Arc<dyn TokenService>,
    cipher: Arc<dyn FieldCipher>,
}

impl RefreshTokenUseCase {
    pub fn new(
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        user_repo: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenService>,
        cipher: Arc<dyn FieldCipher>,
    ) -> Self {
        Self {
            refresh_token_repo,
            user_repo,
            token_service,
            cipher,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(
        &self,
        req: RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, AppError> {
        let token_hash = hash_token(&req.refresh_token);

        // Missing, expired and already rotated records look the same to the caller
        let stored_token = self
            .refresh_token_repo
            .find_by_hash(&token_hash)
            .await
            .map_err(AppError::StoreError)?
            .filter(|t| t.is_valid_at(OffsetDateTime::now_utc()))
            .ok_or_else(|| {
                tracing::warn!("Refresh token not found or expired");
                AppError::InvalidToken
            })?;

        let signed = self
            .token_service
            .verify_refresh_token(&req.refresh_token)
            .ok_or(AppError::InvalidToken)?;

        let user_id = signed.claims.user_id().map_err(|_| AppError::InvalidToken)?;
        if stored_token.user_id != user_id {
            tracing::warn!("Refresh token subject does not match its record");
            return Err(AppError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(AppError::StoreError)?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InactiveAccount);
        }

        // Sign before touching the store so a signing failure changes nothing
        let pair = TokenPair::issue(&user, self.token_service.as_ref(), self.cipher.as_ref())?;

        let rotated = self
            .refresh_token_repo
            .rotate(stored_token.id, pair.refresh_record(user.id))
            .await
            .map_err(|e| {
                tracing::error!("Refresh token rotation failed: {}", e);
                AppError::StoreError(e)
            })?;

        if rotated.is_none() {
            // A concurrent refresh consumed the record first
            tracing::warn!("Refresh token for user {} already consumed", user.id);
            return Err(AppError::InvalidToken);
        }

        tracing::info!("Rotated refresh token for user {}", user.id);
        Ok(pair.into_response(self.token_service.as_ref()))
    }
}

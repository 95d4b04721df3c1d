use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::RefreshTokenRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Invalidates one refresh token. Outstanding access tokens stay valid until they expire.
pub struct LogoutUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutUseCase {
    pub fn new(refresh_token_repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { refresh_token_repo }
    }

    /// Succeeds whether or not the token was still stored
    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: LogoutRequest) -> Result<(), AppError> {
        let deleted = self
            .refresh_token_repo
            .delete_by_hash(&hash_token(&req.refresh_token))
            .await
            .map_err(AppError::StoreError)?;

        if deleted {
            tracing::info!("Refresh token revoked");
        } else {
            tracing::debug!("Logout with unknown refresh token");
        }

        Ok(())
    }
}

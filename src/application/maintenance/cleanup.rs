use crate::domain::auth::RefreshTokenRepository;
use crate::domain::password_reset::PasswordResetTokenRepository;
use crate::shared::error::AppError;
use std::sync::Arc;
use time::OffsetDateTime;

/// Rows removed by one cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub refresh_tokens: u64,
    pub reset_tokens: u64,
}

/// Purges refresh and reset tokens whose expiry has passed.
///
/// Only already-expired rows are touched, so it is safe to run alongside
/// logins and refreshes, and running it again right away deletes nothing.
pub struct CleanupExpiredTokensUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
}

impl CleanupExpiredTokensUseCase {
    pub fn new(
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
    ) -> Self {
        Self {
            refresh_token_repo,
            reset_token_repo,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, now: OffsetDateTime) -> Result<CleanupReport, AppError> {
        let refresh_tokens = self
            .refresh_token_repo
            .delete_expired_before(now)
            .await
            .map_err(AppError::StoreError)?;

        let reset_tokens = self
            .reset_token_repo
            .delete_expired_before(now)
            .await
            .map_err(AppError::StoreError)?;

        Ok(CleanupReport {
            refresh_tokens,
            reset_tokens,
        })
    }
}

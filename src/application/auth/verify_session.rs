use crate::domain::auth::{AccessClaims, TokenService};
use crate::shared::error::AppError;
use std::sync::Arc;

/// Resolves an access token to the claims it was issued with.
///
/// Claims are not re-checked against the current user record; they are trusted
/// until the token expires.
pub struct VerifySessionUseCase {
    token_service: Arc<dyn TokenService>,
}

impl VerifySessionUseCase {
    pub fn new(token_service: Arc<dyn TokenService>) -> Self {
        Self { token_service }
    }

    pub fn execute(&self, access_token: &str) -> Result<AccessClaims, AppError> {
        self.token_service
            .verify_access_token(access_token)
            .map(|signed| signed.claims)
            .ok_or(AppError::InvalidToken)
    }
}

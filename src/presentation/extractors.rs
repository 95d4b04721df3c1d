use crate::application::auth::verify_session::VerifySessionUseCase;
use crate::domain::auth::AccessClaims;
use crate::domain::users::UserRole;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// Authenticated user extractor
/// Validates the bearer access token from the Authorization header
pub struct AuthUser {
    pub claims: AccessClaims,
}

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.claims.user_id().map_err(|_| AppError::InvalidToken)
    }

    /// Role check against the role carried in the token
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.contains(&self.claims.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "The user does not have enough privileges".to_string(),
            ))
        }
    }
}

/// Token part of a `Bearer <token>` header value
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::InvalidToken)?;

        let claims = VerifySessionUseCase::new(state.token_service.clone()).execute(token)?;

        Ok(AuthUser { claims })
    }
}

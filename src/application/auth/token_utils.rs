use crate::application::users::decrypt_phone;
use crate::domain::auth::{AccessClaims, IssuedToken, NewRefreshToken, TokenService};
use crate::domain::encryption::FieldCipher;
use crate::domain::users::User;
use crate::shared::error::AppError;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Common response structure for token operations
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Generate SHA-256 hash of a token string
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A freshly signed access/refresh pair, not yet persisted
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

impl TokenPair {
    /// Sign both tokens for `user`. Nothing is stored, so a failure here has no side effects.
    pub fn issue(
        user: &User,
        token_service: &dyn TokenService,
        cipher: &dyn FieldCipher,
    ) -> Result<Self, AppError> {
        let claims = AccessClaims::for_user(user, decrypt_phone(cipher, user));

        let access = token_service
            .issue_access_token(claims)
            .map_err(AppError::InternalServerError)?;
        let refresh = token_service
            .issue_refresh_token(user.id)
            .map_err(AppError::InternalServerError)?;

        Ok(Self { access, refresh })
    }

    /// Store record for the refresh half; its expiry is the token's own `exp`
    pub fn refresh_record(&self, user_id: uuid::Uuid) -> NewRefreshToken {
        NewRefreshToken {
            user_id,
            token_hash: hash_token(&self.refresh.token),
            expires_at: self.refresh.expires_at,
        }
    }

    pub fn into_response(self, token_service: &dyn TokenService) -> TokenResponse {
        TokenResponse {
            access_token: self.access.token,
            refresh_token: self.refresh.token,
            token_type: "bearer".to_string(),
            expires_in: token_service.access_token_ttl().whole_seconds(),
        }
    }
}

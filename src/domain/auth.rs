use crate::domain::users::{Language, User, UserRole};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Discriminator carried in every token under the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

/// Claims plus the issued-at / expiration pair embedded by the codec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedClaims<C> {
    #[serde(flatten)]
    pub claims: C,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Access token claims, trusted as issued until `exp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub role: UserRole,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub preferred_language: Language,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub token_type: TokenKind,
}

impl AccessClaims {
    /// Build claims for `user`; `phone_number` must already be decrypted.
    pub fn for_user(user: &User, phone_number: Option<String>) -> Self {
        Self {
            sub: user.id.to_string(),
            role: user.role,
            email: user.email.clone(),
            phone_number,
            preferred_language: user.preferred_language,
            token_type: TokenKind::Access,
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        parse_subject(&self.sub)
    }
}

/// Claims of refresh and password-reset tokens: the subject plus a random id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Random token id; makes every issued token unique
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenKind,
}

impl SubjectClaims {
    pub fn new(user_id: Uuid, token_type: TokenKind) -> Self {
        Self {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        parse_subject(&self.sub)
    }
}

fn parse_subject(sub: &str) -> Result<Uuid> {
    Uuid::parse_str(sub).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
}

/// An encoded token together with the instants baked into it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Refresh token entity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl RefreshToken {
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

/// New refresh token for creation
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
}

/// Repository trait for refresh tokens
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Create a new refresh token
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    /// Find a refresh token by its hash
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    /// Atomically delete `consumed_id` and insert `replacement`.
    ///
    /// Returns `None` when `consumed_id` was already gone, in which case nothing
    /// is inserted. A failed insert leaves the consumed record in place.
    async fn rotate(
        &self,
        consumed_id: Uuid,
        replacement: NewRefreshToken,
    ) -> Result<Option<RefreshToken>>;

    /// Delete a specific refresh token by hash
    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool>;

    /// Delete every refresh token whose expiry is at or before `cutoff`
    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64>;
}

/// Signed token codec shared by access, refresh and reset tokens.
///
/// Verification never distinguishes expired, malformed, mistyped or forged
/// tokens: all of them yield `None`.
pub trait TokenService: Send + Sync {
    fn issue_access_token(&self, claims: AccessClaims) -> Result<IssuedToken>;

    fn issue_refresh_token(&self, user_id: Uuid) -> Result<IssuedToken>;

    fn issue_reset_token(&self, user_id: Uuid) -> Result<IssuedToken>;

    fn verify_access_token(&self, token: &str) -> Option<SignedClaims<AccessClaims>>;

    fn verify_refresh_token(&self, token: &str) -> Option<SignedClaims<SubjectClaims>>;

    fn verify_reset_token(&self, token: &str) -> Option<SignedClaims<SubjectClaims>>;

    fn access_token_ttl(&self) -> Duration;
}

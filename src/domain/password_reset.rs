use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Outstanding password reset, stored by hash and deleted when consumed
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl PasswordResetToken {
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct NewPasswordResetToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
}

/// What `reset_password` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Applied,
    /// The record was already gone; nothing was written
    TokenUsed,
    /// The user no longer exists; the record is kept
    UserMissing,
}

#[async_trait]
pub trait PasswordResetTokenRepository: Send + Sync {
    async fn create(&self, token: NewPasswordResetToken) -> Result<PasswordResetToken>;

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>>;

    /// Delete record `id` and store the new password hash of `user_id` as one
    /// unit: either both happen or neither does.
    async fn reset_password(
        &self,
        id: Uuid,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<ResetOutcome>;

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64>;

    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64>;
}

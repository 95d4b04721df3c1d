use crate::domain::password_reset::PasswordResetToken;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetTokenDbModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl From<PasswordResetTokenDbModel> for PasswordResetToken {
    fn from(model: PasswordResetTokenDbModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            token_hash: model.token_hash,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}

use crate::domain::password_reset::{
    NewPasswordResetToken, PasswordResetToken, PasswordResetTokenRepository, ResetOutcome,
};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::password_reset::PasswordResetTokenDbModel;
use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct PostgresPasswordResetTokenRepository {
    pool: DbPool,
}

impl PostgresPasswordResetTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetTokenRepository for PostgresPasswordResetTokenRepository {
    async fn create(&self, token: NewPasswordResetToken) -> Result<PasswordResetToken> {
        let token_db = sqlx::query_as::<_, PasswordResetTokenDbModel>(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token_db.into())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>> {
        let token_db = sqlx::query_as::<_, PasswordResetTokenDbModel>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token_db.map(Into::into))
    }

    async fn reset_password(
        &self,
        id: Uuid,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<ResetOutcome> {
        let mut tx = self.pool.begin().await?;

        // Conditional delete: of two concurrent resets only one sees a row
        let deleted =
            sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(ResetOutcome::TokenUsed);
        }

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, password_changed = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(ResetOutcome::UserMissing);
        }

        tx.commit().await?;

        Ok(ResetOutcome::Applied)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

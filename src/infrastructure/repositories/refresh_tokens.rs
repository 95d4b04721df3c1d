use crate::domain::auth::{NewRefreshToken, RefreshToken, RefreshTokenRepository};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::auth::RefreshTokenDbModel;
use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct PostgresRefreshTokenRepository {
    pool: DbPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const INSERT_REFRESH_TOKEN: &str = r#"
    INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
    VALUES ($1, $2, $3)
    RETURNING id, user_id, token_hash, expires_at, created_at
"#;

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let token_db = sqlx::query_as::<_, RefreshTokenDbModel>(INSERT_REFRESH_TOKEN)
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(token_db.into())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let token_db = sqlx::query_as::<_, RefreshTokenDbModel>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM refresh_tokens
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token_db.map(|t| t.into()))
    }

    async fn rotate(
        &self,
        consumed_id: Uuid,
        replacement: NewRefreshToken,
    ) -> Result<Option<RefreshToken>> {
        let mut tx = self.pool.begin().await?;

        // Conditional delete: the loser of a concurrent rotation sees zero rows
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(consumed_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let token_db = sqlx::query_as::<_, RefreshTokenDbModel>(INSERT_REFRESH_TOKEN)
            .bind(replacement.user_id)
            .bind(&replacement.token_hash)
            .bind(replacement.expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(token_db.into()))
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE expires_at <= $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

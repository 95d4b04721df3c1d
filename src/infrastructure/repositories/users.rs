use crate::domain::users::{DuplicateEmail, NewUser, UpdateProfile, User, UserRepository};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::users::{USER_COLUMNS, UserDbModel};
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let query = format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, role, phone_number,
                               preferred_language, preferred_currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, UserDbModel>(&query)
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .bind(new_user.full_name)
            .bind(new_user.role.as_str())
            .bind(new_user.phone_number)
            .bind(new_user.preferred_language.as_str())
            .bind(new_user.preferred_currency.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => anyhow::Error::new(DuplicateEmail),
                _ => e.into(),
            })?;

        user.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserDbModel>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserDbModel>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfile,
    ) -> Result<Option<User>, anyhow::Error> {
        let query = format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone_number = COALESCE($3, phone_number),
                preferred_language = COALESCE($4, preferred_language),
                preferred_currency = COALESCE($5, preferred_currency),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserDbModel>(&query)
            .bind(id)
            .bind(update.full_name)
            .bind(update.phone_number)
            .bind(update.preferred_language.map(|l| l.as_str()))
            .bind(update.preferred_currency.map(|c| c.as_str()))
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, password_changed = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

use crate::domain::users::User;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserDbModel {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub preferred_language: String,
    pub preferred_currency: String,
    pub is_active: bool,
    pub password_changed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Column list matching `UserDbModel`
pub const USER_COLUMNS: &str = "id, email, password_hash, full_name, role, phone_number, \
     preferred_language, preferred_currency, is_active, password_changed, created_at, updated_at";

impl TryFrom<UserDbModel> for User {
    type Error = anyhow::Error;

    fn try_from(model: UserDbModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            full_name: model.full_name,
            role: model.role.parse().map_err(anyhow::Error::msg)?,
            phone_number: model.phone_number,
            preferred_language: model
                .preferred_language
                .parse()
                .map_err(anyhow::Error::msg)?,
            preferred_currency: model
                .preferred_currency
                .parse()
                .map_err(anyhow::Error::msg)?,
            is_active: model.is_active,
            password_changed: model.password_changed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

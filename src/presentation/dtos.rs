use crate::application::users::decrypt_phone;
use crate::domain::encryption::FieldCipher;
use crate::domain::users::{Currency, Language, User, UserRole};
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// User as returned to clients: no password hash, phone in plaintext
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResource {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "+251911234567")]
    pub phone_number: Option<String>,
    pub preferred_language: Language,
    pub preferred_currency: Currency,
    pub is_active: bool,
    pub password_changed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserResource {
    pub fn from_user(user: User, cipher: &dyn FieldCipher) -> Self {
        let phone_number = decrypt_phone(cipher, &user);
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            phone_number,
            preferred_language: user.preferred_language,
            preferred_currency: user.preferred_currency,
            is_active: user.is_active,
            password_changed: user.password_changed,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

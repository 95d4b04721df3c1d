use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role used for authorization decisions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
    #[default]
    Tenant,
    Broker,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
            UserRole::Tenant => "tenant",
            UserRole::Broker => "broker",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "owner" => Ok(UserRole::Owner),
            "tenant" => Ok(UserRole::Tenant),
            "broker" => Ok(UserRole::Broker),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Am,
    Om,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Am => "am",
            Language::Om => "om",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "am" => Ok(Language::Am),
            "om" => Ok(Language::Om),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Currency {
    #[default]
    #[serde(rename = "ETB")]
    Etb,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Etb => "ETB",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ETB" => Ok(Currency::Etb),
            "USD" => Ok(Currency::Usd),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// `None` for accounts without a local password; those can never log in with one.
    pub password_hash: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    /// Ciphertext produced by a `FieldCipher`, never plaintext.
    pub phone_number: Option<String>,
    pub preferred_language: Language,
    pub preferred_currency: Currency,
    pub is_active: bool,
    pub password_changed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub preferred_language: Language,
    pub preferred_currency: Currency,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_language: Option<Language>,
    pub preferred_currency: Option<Currency>,
}

/// Returned by `UserRepository::create` when the email is already taken
#[derive(Debug, thiserror::Error)]
#[error("Email already registered")]
pub struct DuplicateEmail;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error>;
    async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfile,
    ) -> Result<Option<User>, anyhow::Error>;

    /// Replace the password hash and raise the `password_changed` flag.
    /// Returns `false` when no user has this id.
    async fn update_password(&self, id: Uuid, password_hash: &str)
    -> Result<bool, anyhow::Error>;
}

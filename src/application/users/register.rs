use crate::domain::encryption::FieldCipher;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{
    Currency, DuplicateEmail, Language, NewUser, User, UserRepository, UserRole,
};
use crate::shared::error::AppError;
use crate::shared::validation::validate_phone_number;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Abebe Kebede")]
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+251911234567")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub preferred_language: Language,
    #[serde(default)]
    pub preferred_currency: Currency,
}

pub struct RegisterUserUseCase {
    repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHashingService>,
    cipher: Arc<dyn FieldCipher>,
}

impl RegisterUserUseCase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHashingService>,
        cipher: Arc<dyn FieldCipher>,
    ) -> Self {
        Self {
            repo,
            password_hasher,
            cipher,
        }
    }

    /// Self-service registration; the admin role is only ever seeded
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: RegisterUserRequest) -> Result<User, AppError> {
        if req.role == UserRole::Admin {
            return Err(AppError::Forbidden(
                "Cannot self-register as admin".to_string(),
            ));
        }

        self.create(req).await
    }

    /// Create the account with whatever role the request names
    pub(crate) async fn create(&self, req: RegisterUserRequest) -> Result<User, AppError> {
        if self
            .repo
            .find_by_email(&req.email)
            .await
            .map_err(AppError::StoreError)?
            .is_some()
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self
            .password_hasher
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        let phone_number = req
            .phone_number
            .as_deref()
            .map(|phone| self.cipher.encrypt(phone))
            .transpose()
            .map_err(AppError::InternalServerError)?;

        let new_user = NewUser {
            email: req.email,
            password_hash: Some(password_hash),
            full_name: req.full_name,
            role: req.role,
            phone_number,
            preferred_language: req.preferred_language,
            preferred_currency: req.preferred_currency,
        };

        let user = self.repo.create(new_user).await.map_err(|e| {
            // Lost a race with another registration for the same email
            if e.is::<DuplicateEmail>() {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::StoreError(e)
            }
        })?;

        tracing::info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }
}

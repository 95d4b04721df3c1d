use crate::domain::encryption::FieldCipher;
use crate::domain::users::{Currency, Language, UpdateProfile, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::validation::validate_phone_number;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Omitted fields keep their current value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
    pub preferred_language: Option<Language>,
    pub preferred_currency: Option<Currency>,
}

pub struct UpdateProfileUseCase {
    repo: Arc<dyn UserRepository>,
    cipher: Arc<dyn FieldCipher>,
}

impl UpdateProfileUseCase {
    pub fn new(repo: Arc<dyn UserRepository>, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: Uuid, req: UpdateProfileRequest) -> Result<User, AppError> {
        let phone_number = req
            .phone_number
            .as_deref()
            .map(|phone| self.cipher.encrypt(phone))
            .transpose()
            .map_err(AppError::InternalServerError)?;

        let update = UpdateProfile {
            full_name: req.full_name,
            phone_number,
            preferred_language: req.preferred_language,
            preferred_currency: req.preferred_currency,
        };

        self.repo
            .update_profile(id, update)
            .await
            .map_err(AppError::StoreError)?
            .ok_or(AppError::NotFound)
    }
}

use crate::application::users::register::{RegisterUserRequest, RegisterUserUseCase};
use crate::domain::users::{User, UserRepository, UserRole};
use crate::shared::error::AppError;
use std::sync::Arc;

/// Creates the configured admin account on startup unless the email is already taken
pub struct SeedAdminUseCase {
    repo: Arc<dyn UserRepository>,
    register: RegisterUserUseCase,
}

impl SeedAdminUseCase {
    pub fn new(repo: Arc<dyn UserRepository>, register: RegisterUserUseCase) -> Self {
        Self { repo, register }
    }

    /// Returns the created admin, or `None` when the account already existed
    #[tracing::instrument(skip(self, password))]
    pub async fn execute(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        if self
            .repo
            .find_by_email(email)
            .await
            .map_err(AppError::StoreError)?
            .is_some()
        {
            tracing::debug!("Admin account already present");
            return Ok(None);
        }

        let created = self
            .register
            .create(RegisterUserRequest {
                email: email.to_string(),
                password: password.to_string(),
                full_name: "Admin User".to_string(),
                role: UserRole::Admin,
                phone_number: None,
                preferred_language: Default::default(),
                preferred_currency: Default::default(),
            })
            .await;

        // Another instance may have seeded between the lookup and the insert
        let admin = match created {
            Ok(admin) => admin,
            Err(AppError::Conflict(_)) => {
                tracing::debug!("Admin account seeded concurrently");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Seeded admin account {}", admin.id);
        Ok(Some(admin))
    }
}

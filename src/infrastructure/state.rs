use crate::domain::auth::{RefreshTokenRepository, TokenService};
use crate::domain::email::EmailSender;
use crate::domain::encryption::FieldCipher;
use crate::domain::password::PasswordHashingService;
use crate::domain::password_reset::PasswordResetTokenRepository;
use crate::domain::users::UserRepository;
use crate::infrastructure::auth::JwtTokenService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::email::{LogEmailSender, SmtpEmailSender};
use crate::infrastructure::encryption::AesGcmFieldCipher;
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::repositories::password_reset_tokens::PostgresPasswordResetTokenRepository;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Built once at startup; every collaborator sits behind its domain trait so
/// tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub user_repo: Arc<dyn UserRepository>,
    pub refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    pub reset_token_repo: Arc<dyn PasswordResetTokenRepository>,
    pub token_service: Arc<dyn TokenService>,
    pub password_service: Arc<dyn PasswordHashingService>,
    pub cipher: Arc<dyn FieldCipher>,
    pub email_sender: Arc<dyn EmailSender>,
    /// Base of the emailed reset link, without trailing slash
    pub frontend_url: String,
}

impl AppState {
    /// Wire the PostgreSQL repositories and production services
    pub fn from_config(pool: DbPool, config: &AppConfig) -> anyhow::Result<Self> {
        let email_sender: Arc<dyn EmailSender> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpEmailSender::new(smtp)?),
            None => {
                tracing::warn!("SMTP_HOST not set; password reset emails will not be delivered");
                Arc::new(LogEmailSender)
            }
        };

        Ok(Self {
            user_repo: Arc::new(PostgresUserRepository::new(pool.clone())),
            refresh_token_repo: Arc::new(PostgresRefreshTokenRepository::new(pool.clone())),
            reset_token_repo: Arc::new(PostgresPasswordResetTokenRepository::new(pool.clone())),
            token_service: Arc::new(JwtTokenService::from_config(&config.jwt)?),
            password_service: Arc::new(PasswordService::new()),
            cipher: Arc::new(AesGcmFieldCipher::from_secret(&config.phone_encryption_key)?),
            email_sender,
            frontend_url: config.frontend_url.clone(),
            pool,
        })
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

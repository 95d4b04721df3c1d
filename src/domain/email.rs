use anyhow::Result;
use async_trait::async_trait;

/// Outbound email capability
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_password_reset_email(&self, to_address: &str, reset_link: &str) -> Result<()>;
}

use crate::domain::password::{MAX_PASSWORD_BYTES, PasswordHashingService};
use anyhow::Result;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Infrastructure service for password hashing and verification
#[derive(Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }
}

/// The bytes that actually take part in hashing
fn effective_bytes(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}

impl PasswordHashingService for PasswordService {
    /// Hash a plain text password using Argon2
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = Argon2::default()
            .hash_password(effective_bytes(password), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

        Ok(Argon2::default()
            .verify_password(effective_bytes(password), &parsed_hash)
            .is_ok())
    }
}

use anyhow::Result;

/// Longest prefix of a password, in bytes, that takes part in hashing.
/// Anything beyond it is ignored, for hashing and verification alike.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Trait for password hashing and verification
pub trait PasswordHashingService: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
}

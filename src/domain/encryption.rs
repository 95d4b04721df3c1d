use anyhow::Result;

/// Symmetric encryption for personal fields stored at rest (phone numbers)
pub trait FieldCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String>;
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

//! AES-256-GCM encryption for phone numbers stored at rest.
//!
//! Output is base64 `nonce || ciphertext || tag` with a random 12-byte nonce,
//! so equal plaintexts never produce equal ciphertexts.

use crate::domain::encryption::FieldCipher;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

pub struct AesGcmFieldCipher {
    cipher: Aes256Gcm,
}

impl AesGcmFieldCipher {
    /// Derive the 256-bit key from a configured secret with SHA-256
    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("Encryption key must not be empty");
        }

        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| anyhow::anyhow!("Key init failed: {}", e))?;

        Ok(Self { cipher })
    }
}

impl FieldCipher for AesGcmFieldCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| anyhow::anyhow!("Encryption failed: {}", e))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(combined))
    }

    fn decrypt(&self, encrypted: &str) -> Result<String> {
        let combined = STANDARD
            .decode(encrypted)
            .map_err(|e| anyhow::anyhow!("Base64 decode failed: {}", e))?;

        if combined.len() < NONCE_SIZE + TAG_SIZE {
            anyhow::bail!("Ciphertext too short");
        }

        let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| anyhow::anyhow!("Decryption failed: {}", e))?;

        String::from_utf8(plaintext).map_err(|e| anyhow::anyhow!("UTF-8 decode failed: {}", e))
    }
}

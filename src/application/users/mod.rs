pub mod get;
pub mod register;
pub mod seed_admin;
pub mod update_profile;

use crate::domain::encryption::FieldCipher;
use crate::domain::users::User;

/// Plaintext phone number of `user`.
///
/// A ciphertext that no longer decrypts is logged and treated as absent.
pub fn decrypt_phone(cipher: &dyn FieldCipher, user: &User) -> Option<String> {
    let encrypted = user.phone_number.as_deref()?;
    match cipher.decrypt(encrypted) {
        Ok(phone) => Some(phone),
        Err(e) => {
            tracing::warn!("Could not decrypt phone number of user {}: {}", user.id, e);
            None
        }
    }
}

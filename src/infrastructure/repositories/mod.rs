pub mod memory;
pub mod password_reset_tokens;
pub mod refresh_tokens;
pub mod users;

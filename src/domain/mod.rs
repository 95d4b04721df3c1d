pub mod auth;
pub mod email;
pub mod encryption;
pub mod password;
pub mod password_reset;
pub mod users;

pub mod auth;
pub mod maintenance;
pub mod password_reset;
pub mod users;

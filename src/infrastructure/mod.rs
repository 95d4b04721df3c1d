pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod encryption;
pub mod password;
pub mod repositories;
pub mod scheduler;
pub mod state;

pub mod change_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod token_utils;
pub mod verify_session;

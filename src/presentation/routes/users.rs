use crate::infrastructure::state::AppState;
use crate::presentation::handlers::users;
use axum::{
    Router,
    routing::{get, post},
};

/// Registration and self-service profile routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/me", get(users::get_me).put(users::update_me))
}

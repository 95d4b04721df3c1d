use crate::infrastructure::state::AppState;
use crate::presentation::handlers::auth;
use crate::presentation::middleware::rate_limit::RateLimitLayer;
use axum::{
    Router,
    routing::{get, post},
};

/// Auth routes; credential-accepting endpoints sit behind the per-IP limiter
pub fn routes(rate_limit: RateLimitLayer) -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh_token))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .layer(rate_limit);

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/verify", get(auth::verify))
        .merge(limited)
}

use crate::domain::users::UserRole;
use crate::infrastructure::state::AppState;
use crate::presentation::handlers::admin;
use crate::presentation::middleware::auth::{RequiredRoles, require_role};
use axum::{Extension, Router, middleware, routing::get};

const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/{id}", get(admin::get_user))
        .route_layer(middleware::from_fn_with_state(state, require_role))
        .route_layer(Extension(RequiredRoles(ADMIN_ONLY)))
}

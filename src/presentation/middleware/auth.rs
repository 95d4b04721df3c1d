use crate::domain::users::UserRole;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::AppError;
use axum::{extract::Request, middleware::Next, response::Response};

/// Roles admitted by `require_role`, attached to a router as an extension
#[derive(Clone, Copy, Debug)]
pub struct RequiredRoles(pub &'static [UserRole]);

/// Rejects the request unless the bearer's role is one of the required roles
pub async fn require_role(
    axum::Extension(RequiredRoles(roles)): axum::Extension<RequiredRoles>,
    auth_user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(e) = auth_user.require_role(roles) {
        tracing::warn!(
            "User {} with role {} denied access to {}",
            auth_user.claims.sub,
            auth_user.claims.role,
            request.uri().path()
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}

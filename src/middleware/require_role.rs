use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::{AuthUser, Role};
use crate::error::ApiError;

/// Route layer for admin-only endpoints. Runs after [`super::jwt_auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, &[Role::Admin], "Not authorized as an admin")?;
    Ok(next.run(request).await)
}

/// Route layer for the policy endpoints
pub async fn require_sales_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    require(&request, &[Role::SalesManager], "Access denied. Sales Manager role required.")?;
    Ok(next.run(request).await)
}

fn require(request: &Request, roles: &[Role], message: &str) -> Result<(), ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

    if user.require(roles) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Role check failed");
        Err(ApiError::forbidden(message))
    }
}

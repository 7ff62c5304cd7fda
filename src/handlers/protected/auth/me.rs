use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /auth/me - the identity the current token resolves to
pub async fn me_get(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}

// handlers/public/auth/login.rs - POST /auth/login
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Session;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, alias = "identifier")]
    pub user_id: Option<String>,
    #[serde(default, alias = "secret")]
    pub password: Option<String>,
}

/// POST /auth/login - exchange `{userId, password}` for a 24h session token
///
/// The configured admin logs in with the configured credentials; every other
/// identity must be a sales manager. Unknown ids and wrong passwords produce
/// the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Session> {
    let Json(request) = payload?;

    let (Some(user_id), Some(password)) = (request.user_id, request.password) else {
        return Err(ApiError::bad_request("Please provide userId and password"));
    };

    let session = state.accounts.login(user_id.trim(), &password).await?;
    Ok(ApiResponse::success(session))
}

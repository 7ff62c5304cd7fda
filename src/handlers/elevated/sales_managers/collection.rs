use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::UserSummary;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSalesManagerRequest {
    #[serde(default)]
    pub password: String,
}

/// GET /users/sales-managers - newest first; never includes secrets
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    let managers = state.accounts.list_sales_managers().await?;
    Ok(ApiResponse::success(managers))
}

/// POST /users/sales-managers - create with an auto-assigned `SM####` id
pub async fn post(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    payload: Result<Json<CreateSalesManagerRequest>, JsonRejection>,
) -> ApiResult<UserSummary> {
    let Json(request) = payload?;
    let created = state.accounts.create_sales_manager(&admin, &request.password).await?;
    Ok(ApiResponse::created(created))
}

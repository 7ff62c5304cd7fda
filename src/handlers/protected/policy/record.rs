use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::PolicyRecord;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy::PolicyType;
use crate::state::AppState;

/// PUT /<type>-insurance/:id - partial update of a policy the caller owns
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(policy_type): Extension<PolicyType>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PolicyRecord> {
    let Json(body) = payload?;
    let record = state.policies.update(user.id, policy_type, &id, &body).await?;
    Ok(ApiResponse::success(record))
}

/// DELETE /<type>-insurance/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(policy_type): Extension<PolicyType>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.policies.delete(user.id, policy_type, &id).await?;
    Ok(ApiResponse::message("Policy removed"))
}

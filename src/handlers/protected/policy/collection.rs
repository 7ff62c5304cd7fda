use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::PolicyRecord;
use crate::filter::FilterParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::policy::PolicyType;
use crate::state::AppState;

/// GET /<type>-insurance?month&year&search - caller's own policies, newest designated date first
///
/// Query strings never fail the request: repeated keys keep their first value
/// and an unreadable query lists without filters.
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(policy_type): Extension<PolicyType>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<PolicyRecord>> {
    let params = match query {
        Ok(Query(pairs)) => FilterParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!("Ignoring unreadable listing query: {}", rejection);
            FilterParams::default()
        }
    };

    let records = state.policies.list(user.id, policy_type, &params).await?;
    Ok(ApiResponse::success(records))
}

/// POST /<type>-insurance - create a policy owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(policy_type): Extension<PolicyType>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PolicyRecord> {
    let Json(body) = payload?;
    let record = state.policies.create(user.id, policy_type, &body).await?;
    Ok(ApiResponse::created(record))
}

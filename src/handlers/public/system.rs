// handlers/public/system.rs - GET / and GET /health
use axum::{extract::State, response::IntoResponse};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET / - service name, version and endpoint index
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Policy Desk API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Insurance policy records for sales managers",
        "endpoints": {
            "health": "/health (public)",
            "login": "/auth/login (public)",
            "session": "/auth/me, /auth/change-password (authenticated)",
            "sales_managers": "/users/sales-managers[/:id/reset-password] (admin)",
            "policies": "/health-insurance, /motor-insurance, /life-insurance [/:id] (sales manager)"
        }
    }))
}

/// GET /health - liveness plus a store ping; 503 when the store is unreachable
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": state.store.backend()
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}

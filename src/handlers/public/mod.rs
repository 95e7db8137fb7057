// handlers/public/mod.rs - Public handlers (no authentication required)
pub mod auth;

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /ping - liveness probe
pub async fn ping() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "message": "pong" })))
}

/// GET /health - reports 503 when the database cannot be reached
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let Some(database) = state.database.as_ref() else {
        return Ok(ApiResponse::success(json!({
            "status": "ok",
            "database": "in-memory"
        })));
    };

    match database.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "database": "connected"
        }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("database unavailable"))
        }
    }
}

// handlers/public/auth.rs - POST /v1/auth/signup and POST /v1/auth/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{LoginRequest, SignUpRequest, User};

/// POST /v1/auth/signup - register an account. Responds 201 with the user
/// (password hash never serialized), 409 if the email is taken.
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(request) = payload?;
    let user = state.auth.sign_up(request).await?;
    Ok(ApiResponse::created(user))
}

/// POST /v1/auth/login - exchange credentials for a JWT.
///
/// ```json
/// { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiI..." } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let token = state.auth.login(request).await?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use super::caller_of;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{UserList, UserListRequest};

/// POST /v1/userLists
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserListRequest>, JsonRejection>,
) -> ApiResult<UserList> {
    let Json(request) = payload?;
    let membership = state.user_lists.create(request).await?;
    Ok(ApiResponse::created(membership))
}

/// GET /v1/userLists - memberships of the caller
pub async fn get_by_user(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> ApiResult<Vec<UserList>> {
    let caller = caller_of(&auth_user);
    let memberships = state.user_lists.get_by_user(caller.as_deref()).await?;
    Ok(ApiResponse::success(memberships))
}

/// GET /v1/userLists/:id
pub async fn get(
    State(state): State<AppState>,
    Path(user_list_id): Path<String>,
) -> ApiResult<UserList> {
    let membership = state.user_lists.get(&user_list_id).await?;
    Ok(ApiResponse::success(membership))
}

/// DELETE /v1/userLists/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(user_list_id): Path<String>,
) -> ApiResult<Value> {
    let deleted = state.user_lists.delete(&user_list_id).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use super::caller_of;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{JoinListRequest, List, ListRequest, ListWithItems, UserList};

/// POST /v1/lists - create a list owned by the caller; the caller is enrolled as a member
pub async fn create(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> ApiResult<List> {
    let Json(request) = payload?;
    let caller = caller_of(&auth_user);
    let list = state.lists.create(request, caller.as_deref()).await?;
    Ok(ApiResponse::created(list))
}

/// GET /v1/lists - lists owned by the caller, 204 when there are none
pub async fn get_lists(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> ApiResult<Vec<List>> {
    let caller = caller_of(&auth_user);
    let lists = state.lists.get_lists(caller.as_deref()).await?;
    if lists.is_empty() {
        return Ok(ApiResponse::with_status(lists, StatusCode::NO_CONTENT));
    }
    Ok(ApiResponse::success(lists))
}

/// GET /v1/lists/:id - the list with its items
pub async fn get(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<ListWithItems> {
    let list = state.lists.get(&list_id).await?;
    Ok(ApiResponse::success(list))
}

/// PUT /v1/lists/:id - owner only
pub async fn update(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    auth_user: Option<Extension<AuthUser>>,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> ApiResult<List> {
    let Json(request) = payload?;
    let caller = caller_of(&auth_user);
    let list = state
        .lists
        .update(&list_id, caller.as_deref(), request)
        .await?;
    Ok(ApiResponse::success(list))
}

/// DELETE /v1/lists/:id
///
/// The owner deletes the list together with every membership and item.
/// Anyone else only leaves the list. `deleted` is the number of memberships removed.
pub async fn delete(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    auth_user: Option<Extension<AuthUser>>,
) -> ApiResult<Value> {
    let caller = caller_of(&auth_user);
    let deleted = state.lists.delete(&list_id, caller.as_deref()).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}

/// POST /v1/lists/:id/join
pub async fn join(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    auth_user: Option<Extension<AuthUser>>,
) -> ApiResult<UserList> {
    let caller = caller_of(&auth_user);
    let membership = state.lists.join(&list_id, caller.as_deref()).await?;
    Ok(ApiResponse::created(membership))
}

/// POST /v1/lists/join - join through a shared invite code
pub async fn join_by_invite_code(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    payload: Result<Json<JoinListRequest>, JsonRejection>,
) -> ApiResult<UserList> {
    let Json(request) = payload?;
    let caller = caller_of(&auth_user);
    let membership = state
        .lists
        .join_by_invite_code(&request.invite_code, caller.as_deref())
        .await?;
    Ok(ApiResponse::created(membership))
}

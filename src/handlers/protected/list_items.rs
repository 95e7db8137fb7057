use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use super::caller_of;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{ItemIdsRequest, ListItem, ListItemRequest, UpdateListItemRequest};

/// POST /v1/lists/:id/items
pub async fn create(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    auth_user: Option<Extension<AuthUser>>,
    payload: Result<Json<ListItemRequest>, JsonRejection>,
) -> ApiResult<ListItem> {
    let Json(request) = payload?;
    let caller = caller_of(&auth_user);
    let item = state
        .list_items
        .create(&list_id, caller.as_deref(), request)
        .await?;
    Ok(ApiResponse::created(item))
}

/// GET /v1/lists/:id/items
pub async fn get_by_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> ApiResult<Vec<ListItem>> {
    let items = state.list_items.get_by_list(&list_id).await?;
    Ok(ApiResponse::success(items))
}

/// GET /v1/items/:id
pub async fn get(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<ListItem> {
    let item = state.list_items.get(&item_id).await?;
    Ok(ApiResponse::success(item))
}

/// PUT /v1/items/:id
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    payload: Result<Json<UpdateListItemRequest>, JsonRejection>,
) -> ApiResult<ListItem> {
    let Json(request) = payload?;
    let item = state.list_items.update(&item_id, request).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /v1/items/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<Value> {
    let deleted = state.list_items.delete(&item_id).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}

/// POST /v1/items/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    payload: Result<Json<ItemIdsRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let deleted = state.list_items.bulk_delete(&request.ids).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}

/// POST /v1/items/complete
pub async fn mark_completed(
    State(state): State<AppState>,
    payload: Result<Json<ItemIdsRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let updated = state.list_items.mark_completed(&request.ids).await?;
    Ok(ApiResponse::success(json!({ "updated": updated })))
}

/// POST /v1/items/pending
pub async fn mark_pending(
    State(state): State<AppState>,
    payload: Result<Json<ItemIdsRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let updated = state.list_items.mark_pending(&request.ids).await?;
    Ok(ApiResponse::success(json!({ "updated": updated })))
}

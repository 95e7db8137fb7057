use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single task inside a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewListItem {
    pub list_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub is_done: bool,
}

/// Body of POST /v1/lists/:id/items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItemRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_done: bool,
}

/// Body of PUT /v1/items/:id. The id must match the path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListItemRequest {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_done: bool,
}

/// Body of the bulk item endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemIdsRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

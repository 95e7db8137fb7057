use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Membership of one user in one list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserList {
    pub id: i64,
    pub list_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewUserList {
    pub list_id: i64,
    pub user_id: i64,
}

/// Body of POST /v1/userLists
#[derive(Debug, Clone, Deserialize)]
pub struct UserListRequest {
    pub list_id: i64,
    pub user_id: i64,
}

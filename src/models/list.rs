use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::list_item::ListItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct List {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub invite_code: String,
    pub user_creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl List {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_creator_id == user_id
    }
}

/// Insert payload for a list; the invite code is generated by the list service.
#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub description: String,
    pub invite_code: String,
    pub user_creator_id: i64,
}

/// Body of POST /v1/lists and PUT /v1/lists/:id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ListRequest {
    /// Name of the first required field that is blank, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.description.trim().is_empty() {
            Some("description")
        } else {
            None
        }
    }
}

/// Body of POST /v1/lists/join
#[derive(Debug, Clone, Deserialize)]
pub struct JoinListRequest {
    #[serde(default)]
    pub invite_code: String,
}

/// A list together with its items, as returned by GET /v1/lists/:id
#[derive(Debug, Clone, Serialize)]
pub struct ListWithItems {
    #[serde(flatten)]
    pub list: List,
    pub items: Vec<ListItem>,
}

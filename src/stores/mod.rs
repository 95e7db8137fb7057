//! Persistence seams used by the services.
//!
//! Every lookup reports absence as `Ok(None)` and every delete reports "nothing
//! matched" as `Ok(None)`. `Err` is reserved for the backend actually failing, so
//! callers can tell a missing record apart from a broken store.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{List, ListItem, NewList, NewListItem, NewUser, NewUserList, User, UserList};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryItemStore, InMemoryListStore, InMemoryMembershipStore, InMemoryUserStore};
pub use postgres::{PgItemStore, PgListStore, PgMembershipStore, PgUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ListStore: Send + Sync {
    async fn create(&self, list: NewList) -> StoreResult<List>;
    async fn get(&self, list_id: i64) -> StoreResult<Option<List>>;
    async fn get_by_owner(&self, user_id: i64) -> StoreResult<Vec<List>>;
    async fn get_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<List>>;
    /// Persists name and description. Owner and invite code are never rewritten.
    async fn update(&self, list: &List) -> StoreResult<Option<List>>;
    /// Returns the deleted id, or None when no live list had that id.
    async fn delete(&self, list_id: i64) -> StoreResult<Option<i64>>;
    async fn bulk_delete(&self, list_ids: &[i64]) -> StoreResult<Option<u64>>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn create(&self, membership: NewUserList) -> StoreResult<UserList>;
    async fn get(&self, user_list_id: i64) -> StoreResult<Option<UserList>>;
    /// Returns the number of memberships removed, or None when none matched.
    async fn delete(&self, user_list_ids: &[i64]) -> StoreResult<Option<u64>>;
    async fn get_by_user_id(&self, user_id: i64) -> StoreResult<Vec<UserList>>;
    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<UserList>>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, item: NewListItem) -> StoreResult<ListItem>;
    async fn get(&self, item_id: i64) -> StoreResult<Option<ListItem>>;
    /// Persists title, description and completion flag.
    async fn update(&self, item: &ListItem) -> StoreResult<Option<ListItem>>;
    async fn delete(&self, item_id: i64) -> StoreResult<Option<i64>>;
    async fn bulk_delete(&self, item_ids: &[i64]) -> StoreResult<Option<u64>>;
    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<ListItem>>;
    /// Removes every item of a list. Zero is a valid answer here.
    async fn delete_by_list_id(&self, list_id: i64) -> StoreResult<u64>;
    async fn set_done(&self, item_ids: &[i64], is_done: bool) -> StoreResult<Option<u64>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> StoreResult<User>;
    async fn get(&self, user_id: i64) -> StoreResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Turns a unique-index violation into [`StoreError::Conflict`].
pub(crate) fn conflict_on_unique(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Sqlx(err)
}

/// Treats a zero row count as "nothing matched".
pub(crate) fn affected(rows: u64) -> Option<u64> {
    (rows > 0).then_some(rows)
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{NewUserList, UserList};
use crate::stores::{affected, MembershipStore, StoreResult};

const COLUMNS: &str = "id, list_id, user_id, created_at, updated_at, deleted_at";

pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn create(&self, membership: NewUserList) -> StoreResult<UserList> {
        let sql = format!(
            "INSERT INTO user_lists (list_id, user_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserList>(&sql)
            .bind(membership.list_id)
            .bind(membership.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, user_list_id: i64) -> StoreResult<Option<UserList>> {
        let sql =
            format!("SELECT {COLUMNS} FROM user_lists WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, UserList>(&sql)
            .bind(user_list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, user_list_ids: &[i64]) -> StoreResult<Option<u64>> {
        if user_list_ids.is_empty() {
            return Ok(None);
        }
        let result = sqlx::query(
            "UPDATE user_lists SET deleted_at = now() WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(user_list_ids.to_vec())
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()))
    }

    async fn get_by_user_id(&self, user_id: i64) -> StoreResult<Vec<UserList>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM user_lists WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id"
        );
        let rows = sqlx::query_as::<_, UserList>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<UserList>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM user_lists WHERE list_id = $1 AND deleted_at IS NULL ORDER BY id"
        );
        let rows = sqlx::query_as::<_, UserList>(&sql)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{ListItem, NewListItem};
use crate::stores::{affected, ItemStore, StoreResult};

const COLUMNS: &str =
    "id, list_id, user_id, title, description, is_done, created_at, updated_at, deleted_at";

pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn create(&self, item: NewListItem) -> StoreResult<ListItem> {
        let sql = format!(
            "INSERT INTO list_items (list_id, user_id, title, description, is_done)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListItem>(&sql)
            .bind(item.list_id)
            .bind(item.user_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.is_done)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get(&self, item_id: i64) -> StoreResult<Option<ListItem>> {
        let sql =
            format!("SELECT {COLUMNS} FROM list_items WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, ListItem>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, item: &ListItem) -> StoreResult<Option<ListItem>> {
        let sql = format!(
            "UPDATE list_items SET title = $2, description = $3, is_done = $4, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListItem>(&sql)
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.is_done)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, item_id: i64) -> StoreResult<Option<i64>> {
        let result = sqlx::query(
            "UPDATE list_items SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(item_id)
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()).map(|_| item_id))
    }

    async fn bulk_delete(&self, item_ids: &[i64]) -> StoreResult<Option<u64>> {
        if item_ids.is_empty() {
            return Ok(None);
        }
        let result = sqlx::query(
            "UPDATE list_items SET deleted_at = now() WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(item_ids.to_vec())
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()))
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<ListItem>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM list_items WHERE list_id = $1 AND deleted_at IS NULL ORDER BY id"
        );
        let rows = sqlx::query_as::<_, ListItem>(&sql)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_by_list_id(&self, list_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE list_items SET deleted_at = now() WHERE list_id = $1 AND deleted_at IS NULL",
        )
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_done(&self, item_ids: &[i64], is_done: bool) -> StoreResult<Option<u64>> {
        if item_ids.is_empty() {
            return Ok(None);
        }
        let result = sqlx::query(
            "UPDATE list_items SET is_done = $2, updated_at = now()
             WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(item_ids.to_vec())
        .bind(is_done)
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()))
    }
}

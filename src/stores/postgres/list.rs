use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{List, NewList};
use crate::stores::{affected, conflict_on_unique, ListStore, StoreResult};

const COLUMNS: &str =
    "id, name, description, invite_code, user_creator_id, created_at, updated_at, deleted_at";

pub struct PgListStore {
    pool: PgPool,
}

impl PgListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListStore for PgListStore {
    async fn create(&self, list: NewList) -> StoreResult<List> {
        let sql = format!(
            "INSERT INTO lists (name, description, invite_code, user_creator_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(&list.name)
            .bind(&list.description)
            .bind(&list.invite_code)
            .bind(list.user_creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict_on_unique)?;
        Ok(row)
    }

    async fn get(&self, list_id: i64) -> StoreResult<Option<List>> {
        let sql = format!("SELECT {COLUMNS} FROM lists WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_by_owner(&self, user_id: i64) -> StoreResult<Vec<List>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lists
             WHERE user_creator_id = $1 AND deleted_at IS NULL
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, List>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<List>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM lists WHERE invite_code = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(invite_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, list: &List) -> StoreResult<Option<List>> {
        let sql = format!(
            "UPDATE lists SET name = $2, description = $3, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(list.id)
            .bind(&list.name)
            .bind(&list.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, list_id: i64) -> StoreResult<Option<i64>> {
        let result = sqlx::query(
            "UPDATE lists SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()).map(|_| list_id))
    }

    async fn bulk_delete(&self, list_ids: &[i64]) -> StoreResult<Option<u64>> {
        if list_ids.is_empty() {
            return Ok(None);
        }
        let result = sqlx::query(
            "UPDATE lists SET deleted_at = now() WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(list_ids.to_vec())
        .execute(&self.pool)
        .await?;
        Ok(affected(result.rows_affected()))
    }
}

//! In-memory stores for tests and `--in-memory` local runs.
//!
//! Rows live in a `BTreeMap` behind a `tokio::sync::Mutex`, ids are handed out
//! sequentially from 1, and deletes are soft exactly like the PostgreSQL
//! stores so both backends answer queries the same way.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use crate::models::{List, ListItem, NewList, NewListItem, NewUser, NewUserList, User, UserList};
use crate::stores::{
    affected, ItemStore, ListStore, MembershipStore, StoreError, StoreResult, UserStore,
};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemoryListStore {
    table: Mutex<Table<List>>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn create(&self, list: NewList) -> StoreResult<List> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|l| l.invite_code == list.invite_code)
        {
            return Err(StoreError::Conflict(format!(
                "duplicate invite code {}",
                list.invite_code
            )));
        }

        let now = Utc::now();
        let row = List {
            id: table.allocate_id(),
            name: list.name,
            description: list.description,
            invite_code: list.invite_code,
            user_creator_id: list.user_creator_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, list_id: i64) -> StoreResult<Option<List>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&list_id)
            .filter(|l| l.deleted_at.is_none())
            .cloned())
    }

    async fn get_by_owner(&self, user_id: i64) -> StoreResult<Vec<List>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|l| l.deleted_at.is_none() && l.user_creator_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<List>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|l| l.deleted_at.is_none() && l.invite_code == invite_code)
            .cloned())
    }

    async fn update(&self, list: &List) -> StoreResult<Option<List>> {
        let mut table = self.table.lock().await;
        let Some(row) = table
            .rows
            .get_mut(&list.id)
            .filter(|l| l.deleted_at.is_none())
        else {
            return Ok(None);
        };
        row.name = list.name.clone();
        row.description = list.description.clone();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, list_id: i64) -> StoreResult<Option<i64>> {
        let mut table = self.table.lock().await;
        let deleted = soft_delete(&mut table.rows, &[list_id], |l| &mut l.deleted_at);
        Ok(affected(deleted).map(|_| list_id))
    }

    async fn bulk_delete(&self, list_ids: &[i64]) -> StoreResult<Option<u64>> {
        let mut table = self.table.lock().await;
        Ok(affected(soft_delete(&mut table.rows, list_ids, |l| {
            &mut l.deleted_at
        })))
    }
}

#[derive(Default)]
pub struct InMemoryMembershipStore {
    table: Mutex<Table<UserList>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn create(&self, membership: NewUserList) -> StoreResult<UserList> {
        let mut table = self.table.lock().await;
        let now = Utc::now();
        let row = UserList {
            id: table.allocate_id(),
            list_id: membership.list_id,
            user_id: membership.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, user_list_id: i64) -> StoreResult<Option<UserList>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&user_list_id)
            .filter(|m| m.deleted_at.is_none())
            .cloned())
    }

    async fn delete(&self, user_list_ids: &[i64]) -> StoreResult<Option<u64>> {
        let mut table = self.table.lock().await;
        Ok(affected(soft_delete(&mut table.rows, user_list_ids, |m| {
            &mut m.deleted_at
        })))
    }

    async fn get_by_user_id(&self, user_id: i64) -> StoreResult<Vec<UserList>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|m| m.deleted_at.is_none() && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<UserList>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|m| m.deleted_at.is_none() && m.list_id == list_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryItemStore {
    table: Mutex<Table<ListItem>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(&self, item: NewListItem) -> StoreResult<ListItem> {
        let mut table = self.table.lock().await;
        let now = Utc::now();
        let row = ListItem {
            id: table.allocate_id(),
            list_id: item.list_id,
            user_id: item.user_id,
            title: item.title,
            description: item.description,
            is_done: item.is_done,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, item_id: i64) -> StoreResult<Option<ListItem>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&item_id)
            .filter(|i| i.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, item: &ListItem) -> StoreResult<Option<ListItem>> {
        let mut table = self.table.lock().await;
        let Some(row) = table
            .rows
            .get_mut(&item.id)
            .filter(|i| i.deleted_at.is_none())
        else {
            return Ok(None);
        };
        row.title = item.title.clone();
        row.description = item.description.clone();
        row.is_done = item.is_done;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, item_id: i64) -> StoreResult<Option<i64>> {
        let mut table = self.table.lock().await;
        let deleted = soft_delete(&mut table.rows, &[item_id], |i| &mut i.deleted_at);
        Ok(affected(deleted).map(|_| item_id))
    }

    async fn bulk_delete(&self, item_ids: &[i64]) -> StoreResult<Option<u64>> {
        let mut table = self.table.lock().await;
        Ok(affected(soft_delete(&mut table.rows, item_ids, |i| {
            &mut i.deleted_at
        })))
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<ListItem>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|i| i.deleted_at.is_none() && i.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn delete_by_list_id(&self, list_id: i64) -> StoreResult<u64> {
        let mut table = self.table.lock().await;
        let ids: Vec<i64> = table
            .rows
            .values()
            .filter(|i| i.deleted_at.is_none() && i.list_id == list_id)
            .map(|i| i.id)
            .collect();
        Ok(soft_delete(&mut table.rows, &ids, |i| &mut i.deleted_at))
    }

    async fn set_done(&self, item_ids: &[i64], is_done: bool) -> StoreResult<Option<u64>> {
        let mut table = self.table.lock().await;
        let now = Utc::now();
        let mut updated = 0;
        // Each row counts once, as with `id = ANY($1)`
        let unique: BTreeSet<i64> = item_ids.iter().copied().collect();
        for id in &unique {
            if let Some(row) = table
                .rows
                .get_mut(id)
                .filter(|i| i.deleted_at.is_none())
            {
                row.is_done = is_done;
                row.updated_at = now;
                updated += 1;
            }
        }
        Ok(affected(updated))
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    table: Mutex<Table<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|u| u.deleted_at.is_none() && u.email == user.email)
        {
            return Err(StoreError::Conflict(format!("duplicate email {}", user.email)));
        }

        let now = Utc::now();
        let row = User {
            id: table.allocate_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, user_id: i64) -> StoreResult<Option<User>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&user_id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned())
    }
}

/// Marks the live rows among `ids` as deleted and returns how many changed.
fn soft_delete<T>(
    rows: &mut BTreeMap<i64, T>,
    ids: &[i64],
    deleted_at: impl Fn(&mut T) -> &mut Option<chrono::DateTime<Utc>>,
) -> u64 {
    let now = Utc::now();
    let mut count = 0;
    for id in ids {
        if let Some(row) = rows.get_mut(id) {
            let slot = deleted_at(row);
            if slot.is_none() {
                *slot = Some(now);
                count += 1;
            }
        }
    }
    count
}

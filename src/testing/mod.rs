//! Test fixtures: in-memory stores wired into services, plus a wrapper that
//! makes one chosen store operation fail so error paths can be exercised.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, SecurityConfig};
use crate::models::{List, ListItem, NewList, NewListItem, NewUserList, UserList};
use crate::services::{AuthService, ListItemService, ListService, UserListService};
use crate::stores::{
    InMemoryItemStore, InMemoryListStore, InMemoryMembershipStore, InMemoryUserStore, ItemStore,
    ListStore, MembershipStore, StoreError, StoreResult,
};

/// The store operation that should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    ListDelete,
    MembershipCreate,
    MembershipDelete,
    ItemsGetByList,
    ItemsDeleteByList,
}

pub struct Fixture {
    pub lists: Arc<InMemoryListStore>,
    pub memberships: Arc<InMemoryMembershipStore>,
    pub items: Arc<InMemoryItemStore>,
    pub users: Arc<InMemoryUserStore>,
    pub security: SecurityConfig,
    fail_on: Option<FailOn>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            lists: Arc::new(InMemoryListStore::new()),
            memberships: Arc::new(InMemoryMembershipStore::new()),
            items: Arc::new(InMemoryItemStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            security: test_security(),
            fail_on: None,
        }
    }
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fail_on: FailOn) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::new()
        }
    }

    pub fn list_store(&self) -> Arc<dyn ListStore> {
        Arc::new(Flaky::new(self.lists.clone(), self.fail_on))
    }

    pub fn membership_store(&self) -> Arc<dyn MembershipStore> {
        Arc::new(Flaky::new(self.memberships.clone(), self.fail_on))
    }

    pub fn item_store(&self) -> Arc<dyn ItemStore> {
        Arc::new(Flaky::new(self.items.clone(), self.fail_on))
    }

    pub fn list_service(&self) -> ListService {
        ListService::new(self.list_store(), self.membership_store(), self.item_store())
    }

    pub fn user_list_service(&self) -> UserListService {
        UserListService::new(self.membership_store())
    }

    pub fn list_item_service(&self) -> ListItemService {
        ListItemService::new(self.list_store(), self.item_store())
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.users.clone(), self.security.clone())
    }
}

/// Development security settings with the cheapest bcrypt cost.
pub fn test_security() -> SecurityConfig {
    let mut security = AppConfig::development().security;
    security.password_hash_cost = 4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */;
    security
}

struct Flaky<S> {
    inner: Arc<S>,
    fail_on: Option<FailOn>,
}

impl<S> Flaky<S> {
    fn new(inner: Arc<S>, fail_on: Option<FailOn>) -> Self {
        Self { inner, fail_on }
    }

    fn check(&self, op: FailOn) -> StoreResult<()> {
        if self.fail_on == Some(op) {
            return Err(StoreError::Backend(format!("injected failure: {:?}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: ListStore + 'static> ListStore for Flaky<S> {
    async fn create(&self, list: NewList) -> StoreResult<List> {
        self.inner.create(list).await
    }

    async fn get(&self, list_id: i64) -> StoreResult<Option<List>> {
        self.inner.get(list_id).await
    }

    async fn get_by_owner(&self, user_id: i64) -> StoreResult<Vec<List>> {
        self.inner.get_by_owner(user_id).await
    }

    async fn get_by_invite_code(&self, invite_code: &str) -> StoreResult<Option<List>> {
        self.inner.get_by_invite_code(invite_code).await
    }

    async fn update(&self, list: &List) -> StoreResult<Option<List>> {
        self.inner.update(list).await
    }

    async fn delete(&self, list_id: i64) -> StoreResult<Option<i64>> {
        self.check(FailOn::ListDelete)?;
        self.inner.delete(list_id).await
    }

    async fn bulk_delete(&self, list_ids: &[i64]) -> StoreResult<Option<u64>> {
        self.inner.bulk_delete(list_ids).await
    }
}

#[async_trait]
impl<S: MembershipStore + 'static> MembershipStore for Flaky<S> {
    async fn create(&self, membership: NewUserList) -> StoreResult<UserList> {
        self.check(FailOn::MembershipCreate)?;
        self.inner.create(membership).await
    }

    async fn get(&self, user_list_id: i64) -> StoreResult<Option<UserList>> {
        self.inner.get(user_list_id).await
    }

    async fn delete(&self, user_list_ids: &[i64]) -> StoreResult<Option<u64>> {
        self.check(FailOn::MembershipDelete)?;
        self.inner.delete(user_list_ids).await
    }

    async fn get_by_user_id(&self, user_id: i64) -> StoreResult<Vec<UserList>> {
        self.inner.get_by_user_id(user_id).await
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<UserList>> {
        self.inner.get_by_list_id(list_id).await
    }
}

#[async_trait]
impl<S: ItemStore + 'static> ItemStore for Flaky<S> {
    async fn create(&self, item: NewListItem) -> StoreResult<ListItem> {
        self.inner.create(item).await
    }

    async fn get(&self, item_id: i64) -> StoreResult<Option<ListItem>> {
        self.inner.get(item_id).await
    }

    async fn update(&self, item: &ListItem) -> StoreResult<Option<ListItem>> {
        self.inner.update(item).await
    }

    async fn delete(&self, item_id: i64) -> StoreResult<Option<i64>> {
        self.inner.delete(item_id).await
    }

    async fn bulk_delete(&self, item_ids: &[i64]) -> StoreResult<Option<u64>> {
        self.inner.bulk_delete(item_ids).await
    }

    async fn get_by_list_id(&self, list_id: i64) -> StoreResult<Vec<ListItem>> {
        self.check(FailOn::ItemsGetByList)?;
        self.inner.get_by_list_id(list_id).await
    }

    async fn delete_by_list_id(&self, list_id: i64) -> StoreResult<u64> {
        self.check(FailOn::ItemsDeleteByList)?;
        self.inner.delete_by_list_id(list_id).await
    }

    async fn set_done(&self, item_ids: &[i64], is_done: bool) -> StoreResult<Option<u64>> {
        self.inner.set_done(item_ids, is_done).await
    }
}

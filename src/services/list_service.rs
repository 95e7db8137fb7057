use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{List, ListRequest, ListWithItems, NewList, NewUserList, UserList};
use crate::stores::{ItemStore, ListStore, MembershipStore, StoreError};

use super::{parse_caller, parse_id, ServiceError, ServiceResult};

/// Coordinates the list, membership and item stores.
///
/// Store calls are issued one at a time and the first failure aborts the
/// workflow. Nothing is rolled back: a step that already succeeded stays
/// applied when a later step fails.
#[derive(Clone)]
pub struct ListService {
    lists: Arc<dyn ListStore>,
    memberships: Arc<dyn MembershipStore>,
    items: Arc<dyn ItemStore>,
}

impl ListService {
    pub fn new(
        lists: Arc<dyn ListStore>,
        memberships: Arc<dyn MembershipStore>,
        items: Arc<dyn ItemStore>,
    ) -> Self {
        Self {
            lists,
            memberships,
            items,
        }
    }

    /// Create a list owned by the caller and enroll the caller as its first member.
    ///
    /// If the membership insert fails the list row is left in place.
    pub async fn create(&self, request: ListRequest, caller: Option<&str>) -> ServiceResult<List> {
        let owner_id = parse_caller(caller)?;
        if let Some(field) = request.missing_field() {
            return Err(ServiceError::BadInput(format!("missing required field: {}", field)));
        }

        let new_list = NewList {
            name: request.name,
            description: request.description,
            invite_code: generate_invite_code(),
            user_creator_id: owner_id,
        };

        let list = self.lists.create(new_list).await.map_err(|e| {
            error!("Failed to create list for user {}: {}", owner_id, e);
            e
        })?;

        self.memberships
            .create(NewUserList {
                list_id: list.id,
                user_id: owner_id,
            })
            .await
            .map_err(|e| {
                error!(
                    "List {} created but enrolling owner {} failed: {}",
                    list.id, owner_id, e
                );
                e
            })?;

        info!("User {} created list {}", owner_id, list.id);
        Ok(list)
    }

    /// Fetch a list together with its items.
    pub async fn get(&self, list_id: &str) -> ServiceResult<ListWithItems> {
        let list_id = parse_id("list id", list_id)?;

        let list = self
            .lists
            .get(list_id)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        let items = self.items.get_by_list_id(list_id).await.map_err(|e| {
            error!("Failed to load items for list {}: {}", list_id, e);
            e
        })?;

        Ok(ListWithItems { list, items })
    }

    /// Lists created by the caller.
    pub async fn get_lists(&self, caller: Option<&str>) -> ServiceResult<Vec<List>> {
        let user_id = parse_caller(caller)?;
        Ok(self.lists.get_by_owner(user_id).await?)
    }

    /// Change name and description. Only the owner may do this.
    pub async fn update(
        &self,
        list_id: &str,
        caller: Option<&str>,
        request: ListRequest,
    ) -> ServiceResult<List> {
        let caller_id = parse_caller(caller)?;
        let list_id = parse_id("list id", list_id)?;
        if let Some(field) = request.missing_field() {
            return Err(ServiceError::BadInput(format!("missing required field: {}", field)));
        }

        let mut list = self
            .lists
            .get(list_id)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        if !list.is_owned_by(caller_id) {
            warn!("User {} tried to update list {} it does not own", caller_id, list_id);
            return Err(ServiceError::Forbidden(
                "only the list owner can update it".to_string(),
            ));
        }

        list.name = request.name;
        list.description = request.description;

        let updated = self
            .lists
            .update(&list)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        info!("User {} updated list {}", caller_id, list_id);
        Ok(updated)
    }

    /// Delete on behalf of `caller`.
    ///
    /// The owner removes the list, every membership of it and all of its items.
    /// Anyone else only leaves the list: their own membership goes, nothing else.
    /// Returns how many memberships were removed.
    pub async fn delete(&self, list_id: &str, caller: Option<&str>) -> ServiceResult<u64> {
        let caller_id = parse_caller(caller)?;
        let list_id = parse_id("list id", list_id)?;

        let members = self.memberships.get_by_list_id(list_id).await?;
        let list = self
            .lists
            .get(list_id)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        let is_owner = list.is_owned_by(caller_id);
        let to_remove = memberships_to_remove(&members, caller_id, is_owner);
        debug!(
            "Delete list {} by user {} (owner: {}): {} of {} memberships selected",
            list_id,
            caller_id,
            is_owner,
            to_remove.len(),
            members.len()
        );

        if to_remove.is_empty() {
            warn!("List {} has no membership to remove for user {}", list_id, caller_id);
            return Err(ServiceError::NotFound(format!(
                "no membership found for list {}",
                list_id
            )));
        }

        if is_owner {
            self.lists
                .delete(list_id)
                .await
                .map_err(|e| cascade_failure(list_id, "list", e))?
                .ok_or_else(|| list_not_found(list_id))?;
        }

        let removed = self
            .memberships
            .delete(&to_remove)
            .await
            .map_err(|e| cascade_failure(list_id, "memberships", e))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no membership found for list {}", list_id))
            })?;

        if is_owner {
            let items = self
                .items
                .delete_by_list_id(list_id)
                .await
                .map_err(|e| cascade_failure(list_id, "items", e))?;
            info!(
                "User {} deleted list {} ({} memberships, {} items)",
                caller_id, list_id, removed, items
            );
        } else {
            info!("User {} left list {}", caller_id, list_id);
        }

        Ok(removed)
    }

    /// Add the caller as a member of a list.
    ///
    /// Joining twice creates a second membership row.
    pub async fn join(&self, list_id: &str, caller: Option<&str>) -> ServiceResult<UserList> {
        let user_id = parse_caller(caller)?;
        let list_id = parse_id("list id", list_id)?;

        let list = self
            .lists
            .get(list_id)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        self.enroll(&list, user_id).await
    }

    /// Resolve a list from its invite code and add the caller as a member.
    pub async fn join_by_invite_code(
        &self,
        invite_code: &str,
        caller: Option<&str>,
    ) -> ServiceResult<UserList> {
        let user_id = parse_caller(caller)?;
        let invite_code = invite_code.trim();
        if invite_code.is_empty() {
            return Err(ServiceError::BadInput("missing invite code".to_string()));
        }

        let list = self
            .lists
            .get_by_invite_code(invite_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound("invite code not found".to_string()))?;

        self.enroll(&list, user_id).await
    }

    async fn enroll(&self, list: &List, user_id: i64) -> ServiceResult<UserList> {
        let membership = self
            .memberships
            .create(NewUserList {
                list_id: list.id,
                user_id,
            })
            .await
            .map_err(|e| {
                error!("Failed to add user {} to list {}: {}", user_id, list.id, e);
                e
            })?;

        info!("User {} joined list {}", user_id, list.id);
        Ok(membership)
    }
}

/// 122 random bits in the canonical hyphenated UUID form.
fn generate_invite_code() -> String {
    Uuid::new_v4().to_string()
}

fn memberships_to_remove(members: &[UserList], caller_id: i64, is_owner: bool) -> Vec<i64> {
    members
        .iter()
        .filter(|m| is_owner || m.user_id == caller_id)
        .map(|m| m.id)
        .collect()
}

fn list_not_found(list_id: i64) -> ServiceError {
    ServiceError::NotFound(format!("List with id {} not found", list_id))
}

fn cascade_failure(list_id: i64, step: &str, err: StoreError) -> ServiceError {
    error!("Deleting {} of list {} failed: {}", step, list_id, err);
    ServiceError::Store(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewListItem;
    use crate::testing::{FailOn, Fixture};

    fn request(name: &str, description: &str) -> ListRequest {
        ListRequest {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// List{owner=1}, members 1 and 2, one item.
    async fn shared_list(fx: &Fixture) -> List {
        let list = fx
            .list_service()
            .create(request("Groceries", "Weekly"), Some("1"))
            .await
            .unwrap();
        fx.memberships
            .create(NewUserList {
                list_id: list.id,
                user_id: 2,
            })
            .await
            .unwrap();
        fx.items
            .create(NewListItem {
                list_id: list.id,
                user_id: 1,
                title: "milk".to_string(),
                description: String::new(),
                is_done: false,
            })
            .await
            .unwrap();
        list
    }

    #[tokio::test]
    async fn create_enrolls_owner_with_fresh_invite_code() {
        let fx = Fixture::new();
        let service = fx.list_service();

        let list = service
            .create(request("Groceries", "Weekly"), Some("5"))
            .await
            .unwrap();
        let other = service
            .create(request("Hardware", "Monthly"), Some("5"))
            .await
            .unwrap();

        assert_eq!(list.user_creator_id, 5);
        assert_eq!(list.invite_code.len(), 36);
        assert_ne!(list.invite_code, other.invite_code);

        let members = fx.memberships.get_by_list_id(list.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, 5);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_before_touching_stores() {
        let fx = Fixture::new();
        let service = fx.list_service();

        let err = service
            .create(request("", "Weekly"), Some("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadInput(msg) if msg.contains("name")));

        let err = service.create(request("Groceries", "Weekly"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadInput(_)));

        assert!(fx.lists.get_by_owner(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_keeps_list_when_enrolling_owner_fails() {
        let fx = Fixture::failing(FailOn::MembershipCreate);
        let err = fx
            .list_service()
            .create(request("Groceries", "Weekly"), Some("5"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(fx.lists.get_by_owner(5).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_attaches_items() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;

        let found = fx.list_service().get(&list.id.to_string()).await.unwrap();
        assert_eq!(found.list, list);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].title, "milk");
    }

    #[tokio::test]
    async fn get_missing_list_is_not_found() {
        let fx = Fixture::new();
        let err = fx.list_service().get("99").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_reports_item_failure_as_store_error() {
        let fx = Fixture::failing(FailOn::ItemsGetByList);
        let list = shared_list(&fx).await;

        let err = fx.list_service().get(&list.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[tokio::test]
    async fn owner_delete_cascades_everything() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;
        let service = fx.list_service();

        let removed = service.delete(&list.id.to_string(), Some("1")).await.unwrap();
        assert_eq!(removed, 2);

        assert!(fx.lists.get(list.id).await.unwrap().is_none());
        assert!(fx.memberships.get_by_list_id(list.id).await.unwrap().is_empty());
        assert!(fx.items.get_by_list_id(list.id).await.unwrap().is_empty());
        assert!(matches!(
            service.get(&list.id.to_string()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn member_delete_only_leaves() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;

        let removed = fx
            .list_service()
            .delete(&list.id.to_string(), Some("2"))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        assert!(fx.lists.get(list.id).await.unwrap().is_some());
        let members = fx.memberships.get_by_list_id(list.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, 1);
        assert_eq!(fx.items.get_by_list_id(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn outsider_delete_is_not_found_and_changes_nothing() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;

        let err = fx
            .list_service()
            .delete(&list.id.to_string(), Some("3"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(fx.memberships.get_by_list_id(list.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_without_memberships_is_not_found() {
        let fx = Fixture::new();
        let list = fx
            .lists
            .create(NewList {
                name: "Orphan".to_string(),
                description: "no members".to_string(),
                invite_code: "orphan-code".to_string(),
                user_creator_id: 1,
            })
            .await
            .unwrap();

        let err = fx
            .list_service()
            .delete(&list.id.to_string(), Some("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(fx.lists.get(list.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_validates_input_first() {
        let fx = Fixture::new();
        let service = fx.list_service();

        assert!(matches!(
            service.delete("abc", Some("1")).await,
            Err(ServiceError::BadInput(_))
        ));
        assert!(matches!(
            service.delete("1", None).await,
            Err(ServiceError::BadInput(_))
        ));
    }

    #[tokio::test]
    async fn failed_list_delete_stops_the_cascade() {
        let fx = Fixture::failing(FailOn::ListDelete);
        let list = shared_list(&fx).await;

        let err = fx
            .list_service()
            .delete(&list.id.to_string(), Some("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(fx.memberships.get_by_list_id(list.id).await.unwrap().len(), 2);
        assert_eq!(fx.items.get_by_list_id(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_membership_delete_leaves_list_deleted() {
        let fx = Fixture::failing(FailOn::MembershipDelete);
        let list = shared_list(&fx).await;

        let err = fx
            .list_service()
            .delete(&list.id.to_string(), Some("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));

        assert!(fx.lists.get(list.id).await.unwrap().is_none());
        assert_eq!(fx.memberships.get_by_list_id(list.id).await.unwrap().len(), 2);
        assert_eq!(fx.items.get_by_list_id(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_item_cleanup_leaves_items_behind() {
        let fx = Fixture::failing(FailOn::ItemsDeleteByList);
        let list = shared_list(&fx).await;

        let err = fx
            .list_service()
            .delete(&list.id.to_string(), Some("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));

        // List and memberships are already gone; items remain.
        assert!(fx.lists.get(list.id).await.unwrap().is_none());
        assert!(fx.memberships.get_by_list_id(list.id).await.unwrap().is_empty());
        assert_eq!(fx.items.get_by_list_id(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn join_creates_membership_without_touching_other_data() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;

        let membership = fx
            .list_service()
            .join(&list.id.to_string(), Some("9"))
            .await
            .unwrap();
        assert_eq!(membership.list_id, list.id);
        assert_eq!(membership.user_id, 9);

        assert_eq!(fx.memberships.get_by_list_id(list.id).await.unwrap().len(), 3);
        assert_eq!(fx.items.get_by_list_id(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn join_twice_creates_two_rows() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;
        let service = fx.list_service();

        service.join(&list.id.to_string(), Some("9")).await.unwrap();
        service.join(&list.id.to_string(), Some("9")).await.unwrap();

        let rows = fx.memberships.get_by_user_id(9).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn join_by_invite_code_resolves_list() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;
        let service = fx.list_service();

        let membership = service
            .join_by_invite_code(&list.invite_code, Some("7"))
            .await
            .unwrap();
        assert_eq!(membership.list_id, list.id);

        assert!(matches!(
            service.join_by_invite_code("nope", Some("7")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.join_by_invite_code("  ", Some("7")).await,
            Err(ServiceError::BadInput(_))
        ));
    }

    #[tokio::test]
    async fn join_unknown_list_is_not_found() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.list_service().join("7", Some("9")).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_owner_updates() {
        let fx = Fixture::new();
        let list = shared_list(&fx).await;
        let service = fx.list_service();
        let id = list.id.to_string();

        let err = service
            .update(&id, Some("2"), request("Renamed", "By member"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = service
            .update(&id, Some("1"), request("Renamed", "By owner"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.invite_code, list.invite_code);
        assert_eq!(updated.user_creator_id, 1);
    }

    #[tokio::test]
    async fn get_lists_returns_owned_lists_only() {
        let fx = Fixture::new();
        shared_list(&fx).await;
        let service = fx.list_service();

        assert_eq!(service.get_lists(Some("1")).await.unwrap().len(), 1);
        assert!(service.get_lists(Some("2")).await.unwrap().is_empty());
    }
}

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::{ListItem, ListItemRequest, NewListItem, UpdateListItemRequest};
use crate::stores::{ItemStore, ListStore};

use super::{parse_caller, parse_id, ServiceError, ServiceResult};

/// Item CRUD plus the bulk operations on sets of item ids.
#[derive(Clone)]
pub struct ListItemService {
    lists: Arc<dyn ListStore>,
    items: Arc<dyn ItemStore>,
}

impl ListItemService {
    pub fn new(lists: Arc<dyn ListStore>, items: Arc<dyn ItemStore>) -> Self {
        Self { lists, items }
    }

    /// Add an item to an existing list; the caller is recorded as its creator.
    pub async fn create(
        &self,
        list_id: &str,
        caller: Option<&str>,
        request: ListItemRequest,
    ) -> ServiceResult<ListItem> {
        let user_id = parse_caller(caller)?;
        let list_id = parse_id("list id", list_id)?;
        if request.title.trim().is_empty() {
            return Err(ServiceError::BadInput("missing required field: title".to_string()));
        }

        if self.lists.get(list_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "List with id {} not found",
                list_id
            )));
        }

        let item = self
            .items
            .create(NewListItem {
                list_id,
                user_id,
                title: request.title,
                description: request.description,
                is_done: request.is_done,
            })
            .await?;
        info!("User {} added item {} to list {}", user_id, item.id, list_id);
        Ok(item)
    }

    pub async fn get(&self, item_id: &str) -> ServiceResult<ListItem> {
        let id = parse_id("list item id", item_id)?;
        self.items
            .get(id)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    pub async fn get_by_list(&self, list_id: &str) -> ServiceResult<Vec<ListItem>> {
        let list_id = parse_id("list id", list_id)?;
        Ok(self.items.get_by_list_id(list_id).await?)
    }

    /// The id in the body must match the id in the path.
    pub async fn update(
        &self,
        item_id: &str,
        request: UpdateListItemRequest,
    ) -> ServiceResult<ListItem> {
        let id = parse_id("list item id", item_id)?;
        if request.id != id {
            return Err(ServiceError::BadInput(
                "list item id mismatch between path and body".to_string(),
            ));
        }
        if request.title.trim().is_empty() {
            return Err(ServiceError::BadInput("missing required field: title".to_string()));
        }

        let mut item = self.items.get(id).await?.ok_or_else(|| item_not_found(id))?;
        item.title = request.title;
        item.description = request.description;
        item.is_done = request.is_done;

        self.items
            .update(&item)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    pub async fn delete(&self, item_id: &str) -> ServiceResult<i64> {
        let id = parse_id("list item id", item_id)?;
        self.items
            .delete(id)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    pub async fn bulk_delete(&self, item_ids: &[i64]) -> ServiceResult<u64> {
        require_ids(item_ids)?;
        let deleted = self
            .items
            .bulk_delete(item_ids)
            .await?
            .ok_or_else(|| ServiceError::NotFound("no list items matched".to_string()))?;
        info!("Deleted {} list items", deleted);
        Ok(deleted)
    }

    pub async fn mark_completed(&self, item_ids: &[i64]) -> ServiceResult<u64> {
        self.set_done(item_ids, true).await
    }

    pub async fn mark_pending(&self, item_ids: &[i64]) -> ServiceResult<u64> {
        self.set_done(item_ids, false).await
    }

    async fn set_done(&self, item_ids: &[i64], is_done: bool) -> ServiceResult<u64> {
        require_ids(item_ids)?;
        match self.items.set_done(item_ids, is_done).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!("No list items matched {:?}", item_ids);
                Err(ServiceError::NotFound("no list items matched".to_string()))
            }
        }
    }
}

fn require_ids(item_ids: &[i64]) -> ServiceResult<()> {
    if item_ids.is_empty() {
        return Err(ServiceError::BadInput("no list items received".to_string()));
    }
    Ok(())
}

fn item_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("ListItem with id {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewList;
    use crate::testing::Fixture;

    async fn list_id(fx: &Fixture) -> String {
        fx.lists
            .create(NewList {
                name: "Chores".to_string(),
                description: "House".to_string(),
                invite_code: "chores".to_string(),
                user_creator_id: 1,
            })
            .await
            .unwrap()
            .id
            .to_string()
    }

    fn item(title: &str) -> ListItemRequest {
        ListItemRequest {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_requires_existing_list_and_title() {
        let fx = Fixture::new();
        let service = fx.list_item_service();
        let list_id = list_id(&fx).await;

        let created = service.create(&list_id, Some("1"), item("dishes")).await.unwrap();
        assert_eq!(created.user_id, 1);
        assert!(!created.is_done);

        assert!(matches!(
            service.create("99", Some("1"), item("dishes")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.create(&list_id, Some("1"), item(" ")).await,
            Err(ServiceError::BadInput(_))
        ));
    }

    #[tokio::test]
    async fn update_checks_path_and_body_ids() {
        let fx = Fixture::new();
        let service = fx.list_item_service();
        let list_id = list_id(&fx).await;
        let created = service.create(&list_id, Some("1"), item("dishes")).await.unwrap();

        let mismatch = UpdateListItemRequest {
            id: created.id + 1,
            title: "laundry".to_string(),
            description: String::new(),
            is_done: true,
        };
        assert!(matches!(
            service.update(&created.id.to_string(), mismatch).await,
            Err(ServiceError::BadInput(_))
        ));

        let ok = UpdateListItemRequest {
            id: created.id,
            title: "laundry".to_string(),
            description: "whites".to_string(),
            is_done: true,
        };
        let updated = service.update(&created.id.to_string(), ok).await.unwrap();
        assert_eq!(updated.title, "laundry");
        assert!(updated.is_done);
        assert_eq!(updated.list_id, created.list_id);
    }

    #[tokio::test]
    async fn bulk_operations() {
        let fx = Fixture::new();
        let service = fx.list_item_service();
        let list_id = list_id(&fx).await;

        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(service.create(&list_id, Some("1"), item(title)).await.unwrap().id);
        }

        assert_eq!(service.mark_completed(&ids[..2]).await.unwrap(), 2);
        assert_eq!(service.mark_pending(&ids[..1]).await.unwrap(), 1);
        let done: Vec<bool> = service
            .get_by_list(&list_id)
            .await
            .unwrap()
            .iter()
            .map(|i| i.is_done)
            .collect();
        assert_eq!(done, vec![false, true, false]);

        assert_eq!(service.bulk_delete(&ids[1..]).await.unwrap(), 2);
        assert_eq!(service.get_by_list(&list_id).await.unwrap().len(), 1);
        assert!(matches!(
            service.bulk_delete(&ids[1..]).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.bulk_delete(&[]).await,
            Err(ServiceError::BadInput(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let fx = Fixture::new();
        let service = fx.list_item_service();
        let list_id = list_id(&fx).await;
        let created = service.create(&list_id, Some("1"), item("dishes")).await.unwrap();
        let id = created.id.to_string();

        assert_eq!(service.delete(&id).await.unwrap(), created.id);
        assert!(matches!(service.get(&id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(&id).await, Err(ServiceError::NotFound(_))));
    }
}

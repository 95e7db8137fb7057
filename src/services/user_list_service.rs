use std::sync::Arc;

use tracing::info;

use crate::models::{NewUserList, UserList, UserListRequest};
use crate::stores::MembershipStore;

use super::{parse_caller, parse_id, ServiceError, ServiceResult};

/// Direct access to membership rows.
#[derive(Clone)]
pub struct UserListService {
    memberships: Arc<dyn MembershipStore>,
}

impl UserListService {
    pub fn new(memberships: Arc<dyn MembershipStore>) -> Self {
        Self { memberships }
    }

    pub async fn create(&self, request: UserListRequest) -> ServiceResult<UserList> {
        if request.list_id <= 0 || request.user_id <= 0 {
            return Err(ServiceError::BadInput(
                "list_id and user_id are required".to_string(),
            ));
        }

        let membership = self
            .memberships
            .create(NewUserList {
                list_id: request.list_id,
                user_id: request.user_id,
            })
            .await?;
        info!(
            "Created membership {} (user {} in list {})",
            membership.id, membership.user_id, membership.list_id
        );
        Ok(membership)
    }

    pub async fn get(&self, user_list_id: &str) -> ServiceResult<UserList> {
        let id = parse_id("user list id", user_list_id)?;
        self.memberships
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User list with id {} not found", id)))
    }

    /// Returns the id of the removed membership.
    pub async fn delete(&self, user_list_id: &str) -> ServiceResult<i64> {
        let id = parse_id("user list id", user_list_id)?;
        self.memberships
            .delete(&[id])
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User list with id {} not found", id)))?;
        info!("Deleted membership {}", id);
        Ok(id)
    }

    /// Memberships of the requesting user.
    pub async fn get_by_user(&self, caller: Option<&str>) -> ServiceResult<Vec<UserList>> {
        let user_id = parse_caller(caller)?;
        Ok(self.memberships.get_by_user_id(user_id).await?)
    }
}
